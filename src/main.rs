use anyhow::{bail, Context};
use gcodepath::{
    init_logging, CodecConfig, ToolpathDecoder, ToolpathEncoder, ToolpathMove, TracingSink,
};
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "\
Usage:
  gcodepath decode <program.gcode> [--config <codec.toml>]
  gcodepath encode <settings.txt> <moves.json> [--config <codec.toml>]";

/// Parsed command line
enum Command {
    Decode {
        program: PathBuf,
    },
    Encode {
        settings: PathBuf,
        moves: PathBuf,
    },
}

fn parse_args(args: Vec<String>) -> anyhow::Result<(Command, Option<PathBuf>)> {
    let mut positional = Vec::new();
    let mut config = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config requires a path")?;
            config = Some(PathBuf::from(path));
        } else if arg == "-h" || arg == "--help" {
            bail!("{}", USAGE);
        } else {
            positional.push(arg);
        }
    }

    let command = match positional.as_slice() {
        [cmd, program] if cmd == "decode" => Command::Decode {
            program: PathBuf::from(program),
        },
        [cmd, settings, moves] if cmd == "encode" => Command::Encode {
            settings: PathBuf::from(settings),
            moves: PathBuf::from(moves),
        },
        _ => bail!("{}", USAGE),
    };

    Ok((command, config))
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let (command, config_path) = parse_args(std::env::args().skip(1).collect())?;
    let config = match config_path {
        Some(path) => CodecConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CodecConfig::default(),
    };

    match command {
        Command::Decode { program } => {
            let text = std::fs::read_to_string(&program)
                .with_context(|| format!("Failed to read {}", program.display()))?;
            let decoded = ToolpathDecoder::with_config(config).decode_program(&text)?;
            tracing::info!(
                "Decoded {} segments from {}",
                decoded.len(),
                program.display()
            );
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::Encode { settings, moves } => {
            let settings_text = std::fs::read_to_string(&settings)
                .with_context(|| format!("Failed to read {}", settings.display()))?;
            let settings_lines: Vec<&str> = settings_text.lines().collect();

            let moves_text = std::fs::read_to_string(&moves)
                .with_context(|| format!("Failed to read {}", moves.display()))?;
            let moves: Vec<ToolpathMove> =
                serde_json::from_str(&moves_text).context("Invalid moves JSON")?;

            let program = ToolpathEncoder::with_config(config)
                .with_sink(Arc::new(TracingSink))
                .encode_moves(&settings_lines, &moves)?;
            tracing::info!("Generated {} lines", program.len());
            println!("{}", program.to_text());
        }
    }

    Ok(())
}
