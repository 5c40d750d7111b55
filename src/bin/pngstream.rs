//! pngstream CLI - render procedural test images with the streaming encoder
//! and inspect the chunk layout of the result.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use pngstream_rs::constants::{CRC32_INITIAL, PNG_SIGNATURE};
use pngstream_rs::{ChunkType, ColorMode, EncoderConfig, FileTarget, PngStreamEncoder, crc};

/// Streaming PNG encoder for packed RGB pixel buffers
#[derive(Parser)]
#[command(name = "pngstream")]
#[command(version)]
#[command(about = "Render test images band by band and inspect PNG chunk layout", long_about = None)]
#[command(after_help = "EXAMPLES:
    pngstream render -o checker.png -w 6000 -H 4000 --filter --level 6
    pngstream render -o sepia.png -w 640 -H 480 -m sepia --band-rows 16
    pngstream info -i checker.png")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a checkerboard with a vertical green ramp
    ///
    /// Pixels are generated and encoded one band of rows at a time, so the
    /// full image never has to fit in memory.
    #[command(visible_alias = "r")]
    Render {
        /// Output PNG file
        #[arg(short, long, help = "Path for the encoded output file")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(short, long, default_value = "600")]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long, default_value = "400")]
        height: u32,

        /// Color transform applied to every pixel
        #[arg(short, long, default_value = "direct", value_enum)]
        mode: Mode,

        /// Select the filtered compression strategy
        #[arg(long)]
        filter: bool,

        /// Compression level (0-9)
        #[arg(short, long, default_value = "0")]
        level: u32,

        /// Rows generated and encoded per band
        #[arg(short, long, default_value = "100")]
        band_rows: u32,

        /// Upper bound of one IDAT payload in bytes
        #[arg(long, default_value = "32768")]
        chunk_size: usize,
    },

    /// List the chunks of a PNG file and verify their CRCs
    #[command(visible_alias = "i")]
    Info {
        /// Input PNG file
        #[arg(short, long, help = "Path to the PNG file to inspect")]
        input: PathBuf,

        /// Print every chunk instead of a per-type summary
        #[arg(short, long)]
        extended: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Color taken straight from the pixel value
    Direct,
    /// Integer luminance
    Grayscale,
    /// Sepia tone
    Sepia,
}

impl From<Mode> for ColorMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Direct => ColorMode::Direct,
            Mode::Grayscale => ColorMode::Grayscale,
            Mode::Sepia => ColorMode::Sepia,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            output,
            width,
            height,
            mode,
            filter,
            level,
            band_rows,
            chunk_size,
        } => {
            let config = EncoderConfig {
                width,
                height,
                color_mode: mode.into(),
                filter_strategy: pngstream_rs::FilterStrategy::from_flag(filter),
                compression_level: level,
                chunk_size,
            };
            render(&output, config, band_rows)
        }
        Commands::Info { input, extended } => show_info(&input, extended),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// One band of the test pattern: alternating black and green squares whose
/// green level rises with the band index.
fn checker_band(width: u32, first_row: u32, rows: u32, band: u32, bands: u32) -> Vec<u32> {
    let green = 0xFF * band / bands.max(1);
    let color = 0xFF00_0000 | (green << 8);
    (0..rows)
        .flat_map(|r| {
            let y = first_row + r;
            (0..width).map(move |x| if (x + y) % 2 == 1 { color } else { 0 })
        })
        .collect()
}

fn render(
    output: &PathBuf,
    config: EncoderConfig,
    band_rows: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let band_rows = band_rows.clamp(1, config.height.max(1));
    let bands = config.height.div_ceil(band_rows);

    let mut encoder = PngStreamEncoder::new(FileTarget::new(output));
    encoder.configure(config)?;
    encoder.start()?;

    for band in 0..bands {
        let first_row = band * band_rows;
        let rows = band_rows.min(config.height - first_row);
        let pixels = checker_band(config.width, first_row, rows, band, bands);
        encoder.write_data(&pixels, band + 1 == bands)?;
    }
    encoder.end()?;

    println!(
        "✓ Rendered {}x{} image in {} band(s) to {:?} ({} bytes)",
        config.width,
        config.height,
        bands,
        output,
        encoder.bytes_written()
    );
    Ok(())
}

/// Length and tag of the chunk at `pos`, or `None` once fewer than 12 bytes
/// remain. Errors if the declared payload runs past the end of `data`.
fn chunk_at(
    data: &[u8],
    pos: usize,
) -> Result<Option<(usize, [u8; 4])>, Box<dyn std::error::Error>> {
    let remaining = data.len().saturating_sub(pos);
    if remaining < 12 {
        return Ok(None);
    }
    let len = u32::from_be_bytes(data[pos..pos + 4].try_into()?) as usize;
    let tag: [u8; 4] = data[pos + 4..pos + 8].try_into()?;
    // Compare against what is left so a forged length cannot overflow.
    if len > remaining - 12 {
        return Err(format!("truncated chunk at offset {}", pos).into());
    }
    Ok(Some((len, tag)))
}

fn show_info(input: &PathBuf, extended: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;

    println!("File: {:?}", input);
    println!("Size: {} bytes", data.len());

    if !data.starts_with(&PNG_SIGNATURE) {
        return Err("not a PNG file (signature mismatch)".into());
    }

    let mut pos = PNG_SIGNATURE.len();
    let mut counts: Vec<(String, usize, usize)> = Vec::new();
    let mut bad_crc = 0usize;

    while let Some((len, tag)) = chunk_at(&data, pos)? {
        let payload = &data[pos + 8..pos + 8 + len];
        let stored = u32::from_be_bytes(data[pos + 8 + len..pos + 12 + len].try_into()?);
        let computed = crc::finalize(crc::update(crc::update(CRC32_INITIAL, &tag), payload));

        let name = match ChunkType::try_from(tag) {
            Ok(chunk_type) => chunk_type.name().to_string(),
            Err(_) => String::from_utf8_lossy(&tag).into_owned(),
        };
        if stored != computed {
            bad_crc += 1;
        }

        if extended {
            println!(
                "  @{:<10} {} {:>8} bytes  crc {:08X} {}",
                pos,
                name,
                len,
                stored,
                if stored == computed { "ok" } else { "MISMATCH" }
            );
        }
        if name == "IHDR" && len >= 13 {
            println!(
                "Dimensions: {}x{}, bit depth {}, color type {}",
                u32::from_be_bytes(payload[0..4].try_into()?),
                u32::from_be_bytes(payload[4..8].try_into()?),
                payload[8],
                payload[9]
            );
        }

        match counts.iter().position(|(n, _, _)| *n == name) {
            Some(i) => {
                counts[i].1 += 1;
                counts[i].2 += len;
            }
            None => counts.push((name, 1, len)),
        }
        pos += 12 + len;
    }

    println!();
    for (name, count, bytes) in &counts {
        println!("  {}: {} chunk(s), {} payload bytes", name, count, bytes);
    }
    if pos != data.len() {
        println!("  {} trailing byte(s) after last chunk", data.len() - pos);
    }
    if bad_crc > 0 {
        return Err(format!("{} chunk(s) with CRC mismatch", bad_crc).into());
    }
    println!("All CRCs valid");
    Ok(())
}
