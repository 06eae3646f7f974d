use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_packer_core::{
    AtlasPackerError, ExportFormat, InputImage, PackerConfig, PackingResult, Strategy,
    pack_images, pack_layout,
};
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-packer",
    about = "Pack sprite images into a single texture atlas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into an atlas PNG plus the requested metadata
    Pack(PackArgs),
    /// Layout-only export (no PNG): read image sizes, compute placements, write metadata
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input directory containing .png/.jpg/.jpeg images
    #[arg(short, long, help_heading = "Input/Output")]
    input: PathBuf,
    /// Output atlas image path; metadata files are written next to it
    #[arg(short, long, help_heading = "Input/Output")]
    output: PathBuf,
    /// Descend into subdirectories (keys become relative paths without extension)
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    recursive: bool,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Maximum atlas width
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_width: u32,
    /// Maximum atlas height
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_height: u32,
    /// Padding between sprites
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    padding: u32,
    /// Allow 90° rotation for better packing
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    enable_rotation: bool,
    /// Placement strategy: shelf | skyline
    #[arg(long, value_parser = ["shelf", "skyline"], default_value = "shelf", help_heading = "Layout")]
    strategy: String,

    // Optimal size
    /// Search several target widths and keep the smallest atlas
    #[arg(long, default_value_t = false, help_heading = "Optimal size")]
    find_optimal_size: bool,
    /// Time budget for the optimal-size search (ms)
    #[arg(long, help_heading = "Optimal size")]
    time_budget: Option<u64>,
    /// Evaluate optimal-size candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Optimal size")]
    parallel: bool,

    // Export
    /// Generate a Cocos2d .plist file
    #[arg(long, default_value_t = false, help_heading = "Export")]
    generate_plist: bool,
    /// Generate a Spine .atlas file
    #[arg(long, default_value_t = false, help_heading = "Export")]
    generate_atlas: bool,
    /// Generate a JSON hash .json file
    #[arg(long, default_value_t = false, help_heading = "Export")]
    generate_json: bool,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit: json|yaml
    #[arg(long, num_args = 0..=1, default_missing_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config: Option<String>,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

impl PackArgs {
    fn formats(&self) -> Vec<ExportFormat> {
        let mut formats = Vec::new();
        if self.generate_plist {
            formats.push(ExportFormat::Plist);
        }
        if self.generate_atlas {
            formats.push(ExportFormat::Atlas);
        }
        if self.generate_json {
            formats.push(ExportFormat::JsonHash);
        }
        formats
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Pack(args) => run_pack(args, show_progress),
        Commands::Layout(args) => run_layout(args, show_progress),
    }
}

fn run_pack(args: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(args)?;
    if let Some(fmt) = &args.print_config {
        return print_config(&cfg, fmt);
    }

    let paths = gather_paths(&args.input, args.recursive, &args.include, &args.exclude)?;
    let inputs = load_with_progress(&paths, show_progress, |p| {
        Ok(InputImage {
            key: sprite_key(&args.input, p, args.recursive)?,
            image: load_image(p)?,
        })
    })?;
    info!(count = inputs.len(), "loaded input images");

    let out = pack_images(inputs, cfg)?;
    let metadata = render_metadata(&out.result, &args.output, &args.formats())?;

    if args.dry_run {
        println!("{}", out.stats().summary());
        return Ok(());
    }

    create_parent_dir(&args.output)?;
    out.rgba
        .save(&args.output)
        .with_context(|| format!("write {}", args.output.display()))?;
    debug!(path = ?args.output, "atlas image written");
    write_metadata(&metadata)?;
    export_stats(args, &out.result)?;

    info!(
        width = out.result.width,
        height = out.result.height,
        sprites = out.result.placements.len(),
        "texture atlas created"
    );
    Ok(())
}

fn run_layout(args: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(args)?;
    if let Some(fmt) = &args.print_config {
        return print_config(&cfg, fmt);
    }

    let paths = gather_paths(&args.input, args.recursive, &args.include, &args.exclude)?;
    let sizes = load_with_progress(&paths, show_progress, |p| {
        let (w, h) =
            image::image_dimensions(p).with_context(|| format!("read {}", p.display()))?;
        Ok((sprite_key(&args.input, p, args.recursive)?, w, h))
    })?;
    info!(count = sizes.len(), "read input image sizes");

    let result = pack_layout(sizes, cfg)?;
    let mut formats = args.formats();
    if formats.is_empty() {
        formats.push(ExportFormat::JsonHash);
    }
    let metadata = render_metadata(&result, &args.output, &formats)?;

    if args.dry_run {
        println!("{}", result.stats().summary());
        return Ok(());
    }

    write_metadata(&metadata)?;
    export_stats(args, &result)?;
    info!(
        width = result.width,
        height = result.height,
        sprites = result.placements.len(),
        "atlas layout written"
    );
    Ok(())
}

fn build_config(args: &PackArgs) -> anyhow::Result<PackerConfig> {
    let strategy: Strategy = args
        .strategy
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown strategy: {}", args.strategy))?;
    let cfg = PackerConfig {
        max_width: args.max_width,
        max_height: args.max_height,
        padding: args.padding,
        allow_rotation: args.enable_rotation,
        strategy,
        find_optimal_size: args.find_optimal_size,
        time_budget_ms: args.time_budget,
        parallel: args.parallel,
    };
    // Config file overrides flags field by field
    let cfg = if let Some(path) = &args.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse {}", path.display()))?;
        y.into_packer_config(cfg)?
    } else {
        cfg
    };
    cfg.validate()?;
    Ok(cfg)
}

fn print_config(cfg: &PackerConfig, fmt: &str) -> anyhow::Result<()> {
    match fmt {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

/// Renders every requested format up front so a failure leaves nothing half-written.
fn render_metadata(
    result: &PackingResult,
    output: &Path,
    formats: &[ExportFormat],
) -> anyhow::Result<Vec<(PathBuf, String)>> {
    let texture_file_name = output
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("output path has no file name: {}", output.display()))?;
    formats
        .iter()
        .map(|fmt| -> anyhow::Result<(PathBuf, String)> {
            let text = fmt.render(result, texture_file_name)?;
            Ok((output.with_extension(fmt.extension()), text))
        })
        .collect()
}

fn write_metadata(files: &[(PathBuf, String)]) -> anyhow::Result<()> {
    for (path, text) in files {
        create_parent_dir(path)?;
        fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "metadata written");
    }
    Ok(())
}

fn export_stats(args: &PackArgs, result: &PackingResult) -> anyhow::Result<()> {
    let Some(stats_path) = &args.export_stats else {
        return Ok(());
    };
    let stats = result.stats();
    info!(
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        wasted = stats.wasted_area(),
        "stats"
    );
    create_parent_dir(stats_path)?;
    fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
        .with_context(|| format!("write {}", stats_path.display()))?;
    info!(?stats_path, "stats exported");
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    Ok(())
}

fn gather_paths(
    dir: &Path,
    recursive: bool,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AtlasPackerError::InputMissing(format!(
            "input directory {} does not exist",
            dir.display()
        ))
        .into());
    }
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
            list.push(p.to_path_buf());
        }
    }
    if list.is_empty() {
        return Err(AtlasPackerError::InputMissing(format!(
            "no .png/.jpg/.jpeg images found in {}",
            dir.display()
        ))
        .into());
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("invalid glob {pat}"))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

/// File stem, or the `/`-separated path relative to `root` without extension when recursive.
fn sprite_key(root: &Path, p: &Path, recursive: bool) -> anyhow::Result<String> {
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("non UTF-8 file name: {}", p.display()))?;
    if !recursive {
        return Ok(stem.to_string());
    }
    let rel = p
        .strip_prefix(root)
        .unwrap_or(p)
        .with_extension("");
    Ok(rel.to_string_lossy().replace('\\', "/"))
}

fn load_with_progress<T>(
    paths: &[PathBuf],
    progress: bool,
    mut load: impl FnMut(&Path) -> anyhow::Result<T>,
) -> anyhow::Result<Vec<T>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        list.push(load(p)?);
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    max_width: Option<u32>,
    max_height: Option<u32>,
    padding: Option<u32>,
    allow_rotation: Option<bool>,
    strategy: Option<String>,
    find_optimal_size: Option<bool>,
    time_budget_ms: Option<u64>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.max_width {
            cfg.max_width = v;
        }
        if let Some(v) = self.max_height {
            cfg.max_height = v;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        if let Some(v) = self.strategy {
            cfg.strategy = v
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown strategy in config: {v}"))?;
        }
        if let Some(v) = self.find_optimal_size {
            cfg.find_optimal_size = v;
        }
        if let Some(v) = self.time_budget_ms {
            cfg.time_budget_ms = Some(v);
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
