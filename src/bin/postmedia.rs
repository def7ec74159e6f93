use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "postmedia", version)]
struct Cli {
    /// Engine config JSON (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop, filter and caption an image.
    Compose(ComposeArgs),
    /// Decode a base64 PCM artifact into a WAV file.
    DecodeAudio(DecodeAudioArgs),
    /// Play a base64 PCM artifact on the default output device.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Source image: raw image bytes, base64 text or a `data:` URI.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edit options JSON.
    #[arg(long)]
    options: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Extra font files to register (repeatable).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Write the base64 artifact text instead of raw image bytes.
    #[arg(long)]
    base64: bool,
}

#[derive(Parser, Debug)]
struct DecodeAudioArgs {
    /// Base64 text or `data:` URI holding s16le PCM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Base64 text or `data:` URI holding s16le PCM.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Compose(args) => cmd_compose(&config, args),
        Command::DecodeAudio(args) => cmd_decode_audio(&config, args),
        Command::Play(args) => cmd_play(&config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<postmedia::EngineConfig> {
    let mut config = match path {
        Some(p) => postmedia::EngineConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => postmedia::EngineConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Read an artifact file holding base64 text or a `data:` URI.
fn read_artifact_text(path: &Path) -> anyhow::Result<postmedia::EncodedArtifact> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read artifact '{}'", path.display()))?;
    let text = text.trim();
    if text.starts_with("data:") {
        let (_mime, artifact) = postmedia::EncodedArtifact::from_data_uri(text)?;
        Ok(artifact)
    } else {
        Ok(postmedia::EncodedArtifact::from_encoded(text))
    }
}

/// Read a source image as raw bytes or as an artifact text file.
fn read_image_artifact(path: &Path) -> anyhow::Result<postmedia::EncodedArtifact> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    if image::guess_format(&bytes).is_ok() {
        return Ok(postmedia::EncodedArtifact::from_bytes(&bytes));
    }
    read_artifact_text(path)
}

fn cmd_compose(config: &postmedia::EngineConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let artifact = read_image_artifact(&args.in_path)?;
    let options_json = std::fs::read_to_string(&args.options)
        .with_context(|| format!("read options '{}'", args.options.display()))?;
    let options = postmedia::EditOptions::from_json(&options_json)
        .with_context(|| "parse edit options JSON")?;
    options.validate()?;

    let mut fonts = config.load_fonts()?;
    for f in &args.fonts {
        fonts
            .register_file(f)
            .with_context(|| format!("register font '{}'", f.display()))?;
    }

    let mut compositor = postmedia::ImageCompositor::new(fonts, config.compositor_opts());
    let out = compositor.compose_image(&artifact, &options)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    let written = if args.base64 {
        std::fs::write(&args.out, out.as_str())
    } else {
        std::fs::write(&args.out, out.to_bytes()?)
    };
    written.with_context(|| format!("write '{}'", args.out.display()))?;

    tracing::info!(
        out = %args.out.display(),
        format = ?config.image.format,
        "composed image"
    );
    Ok(())
}

fn cmd_decode_audio(config: &postmedia::EngineConfig, args: DecodeAudioArgs) -> anyhow::Result<()> {
    let artifact = read_artifact_text(&args.in_path)?;
    let buffer = postmedia::decode_audio_with(&artifact, config.pcm_format())?;
    buffer.write_wav(&args.out)?;
    tracing::info!(
        out = %args.out.display(),
        frames = buffer.frames(),
        seconds = buffer.duration_secs(),
        "decoded audio"
    );
    Ok(())
}

#[cfg(feature = "cpal")]
fn cmd_play(config: &postmedia::EngineConfig, args: PlayArgs) -> anyhow::Result<()> {
    let artifact = read_artifact_text(&args.in_path)?;
    let buffer = postmedia::decode_audio_with(&artifact, config.pcm_format())?;
    let device = postmedia::CpalOutput::open_default()?;
    let mut controller = postmedia::PlaybackController::new(device);
    let session = controller.play(&buffer)?;
    let end = session.completion.wait();
    tracing::info!(?end, seconds = buffer.duration_secs(), "playback finished");
    Ok(())
}

#[cfg(not(feature = "cpal"))]
fn cmd_play(config: &postmedia::EngineConfig, args: PlayArgs) -> anyhow::Result<()> {
    let artifact = read_artifact_text(&args.in_path)?;
    let buffer = postmedia::decode_audio_with(&artifact, config.pcm_format())?;
    anyhow::bail!(
        "decoded {:.2}s of audio, but this build has no audio output (rebuild with --features cpal)",
        buffer.duration_secs()
    )
}
