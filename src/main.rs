use vidsplit::{
    cli::{Cli, Commands, SplitArgs},
    config,
    pipeline::{self, Pipeline},
};
use vidsplit_av::{FfmpegTool, ProbeClient, ToolRegistry};

use anyhow::Result;
use clap::Parser;
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidsplit=debug,vidsplit_av=debug,vidsplit_core=debug".to_string()
        } else {
            "vidsplit=info,vidsplit_av=info,vidsplit_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        let code = err
            .chain()
            .find_map(|e| e.downcast_ref::<vidsplit_core::Error>())
            .map(vidsplit_core::Error::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Download {
            url,
            output_dir,
            split,
        } => block_on(download(&url, output_dir.as_deref(), config_path, &split)),
        Commands::Split { file, split } => block_on(split_file(&file, config_path, &split)),
        Commands::Plan { file, split, json } => block_on(plan_file(&file, config_path, &split, json)),
        Commands::Probe { file } => block_on(probe_file(&file, config_path)),
        Commands::CheckTools => block_on(check_tools(config_path)),
        Commands::Validate {
            config: validate_path,
        } => validate_config(validate_path.as_deref().or(config_path)),
        Commands::Version => {
            println!("vidsplit {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(fut: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(fut)
}

fn load(config_path: Option<&Path>, split: &SplitArgs) -> Result<config::Config> {
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_split_args(&mut config, split)?;
    Ok(config)
}

async fn download(
    url: &str,
    output_dir: Option<&Path>,
    config_path: Option<&Path>,
    split: &SplitArgs,
) -> Result<()> {
    let config = load(config_path, split)?;
    let tools = ToolRegistry::discover(&config.tools);
    let pipeline = Pipeline::from_config(&config, &tools)?;

    let output_dir = output_dir.unwrap_or(config.fetch.output_dir.as_path());
    let chunks = pipeline.run(url, output_dir).await?;

    for chunk in chunks {
        println!("{}", chunk.display());
    }
    Ok(())
}

async fn split_file(file: &Path, config_path: Option<&Path>, split: &SplitArgs) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Input file does not exist: {:?}", file);
    }

    let config = load(config_path, split)?;
    let tools = ToolRegistry::discover(&config.tools);
    let splitter = pipeline::splitter_from_config(&config, &tools)?;

    for chunk in splitter.split(file).await? {
        println!("{}", chunk.display());
    }
    Ok(())
}

async fn plan_file(
    file: &Path,
    config_path: Option<&Path>,
    split: &SplitArgs,
    json: bool,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Input file does not exist: {:?}", file);
    }

    let config = load(config_path, split)?;
    let tools = ToolRegistry::discover(&config.tools);
    let splitter = pipeline::splitter_from_config(&config, &tools)?;

    let planned = splitter.plan_for(file).await?;

    if json {
        let value = match &planned {
            Some((plan, chunks)) => serde_json::json!({ "split": true, "plan": plan, "chunks": chunks }),
            None => serde_json::json!({ "split": false, "chunks": [file] }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match planned {
        None => {
            println!("File: {}", file.display());
            println!(
                "Within the {} MB limit; no split needed",
                config.split.max_size_mb
            );
        }
        Some((plan, chunks)) => {
            println!("File: {}", file.display());
            println!("Size: {} bytes", plan.size_bytes);
            println!("Duration: {}s", plan.total_duration_secs);
            println!("Estimated chunks: {:.2}", plan.estimated_chunks);
            println!(
                "Parts: {} x {}s",
                plan.chunk_count, plan.chunk_duration_secs
            );
            for chunk in chunks {
                println!(
                    "  [{}] {}s +{}s -> {}",
                    chunk.index,
                    chunk.start_secs,
                    chunk.duration_secs,
                    chunk.output_path.display()
                );
            }
        }
    }
    Ok(())
}

async fn probe_file(file: &Path, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools);
    let ffmpeg = FfmpegTool::from_registry(&tools)?;

    let secs = ffmpeg.probe_duration(file).await?;
    println!("{}", secs);
    Ok(())
}

async fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all().await;
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. ffmpeg is required for splitting, yt-dlp for downloads.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Max part size: {} MB", config.split.max_size_mb);
    println!("  Safety margin: {}", config.split.safety_margin);
    println!("  Jobs: {}", config.split.jobs);
    println!("  Size policy: {:?}", config.split.size_policy);
    println!("  Fetch format: {}", config.fetch.format);

    Ok(())
}
