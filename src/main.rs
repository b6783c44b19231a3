use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use graphscene::{FrameSnapshot, Scene, SceneConfig};

/// Drive a view-animated graph scene without a renderer.
#[derive(Parser)]
#[command(name = "graphscene")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the views of a scene
    Views {
        /// Scene document (.yaml, .yml or .json); defaults to the built-in dashboard
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },
    /// Load and validate a scene document
    Check {
        /// Scene document (.yaml, .yml or .json)
        #[arg(short, long)]
        scene: PathBuf,
    },
    /// Switch through views, running frames after each, and print the last frame
    Simulate {
        /// Scene document (.yaml, .yml or .json); defaults to the built-in dashboard
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// View to switch to; repeat to visit several in order
        #[arg(long = "view")]
        views: Vec<String>,

        /// Frames to run after each view switch
        #[arg(short, long, default_value = "120")]
        frames: usize,

        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,

        /// Snapshot output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the snapshot to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn load_config(scene: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match scene {
        Some(path) => SceneConfig::from_path(path)
            .with_context(|| format!("failed to load scene {}", path.display())),
        None => Ok(SceneConfig::dashboard()),
    }
}

fn build_scene(scene: Option<&Path>) -> anyhow::Result<Scene> {
    let config = load_config(scene)?;
    let scene = Scene::from_config(&config)
        .with_context(|| format!("invalid scene '{}'", config.name))?;
    Ok(scene)
}

/// One view per line, the active one marked
fn view_listing(scene: &Scene) -> String {
    scene
        .view_names()
        .map(|name| {
            if name == scene.active_view() {
                format!("{name} (initial)\n")
            } else {
                format!("{name}\n")
            }
        })
        .collect()
}

fn simulate(
    scene: &mut Scene,
    views: &[String],
    frames: usize,
    dt: f32,
) -> anyhow::Result<FrameSnapshot> {
    let mut last = scene.frame(0.0);
    if views.is_empty() {
        for _ in 0..frames {
            last = scene.frame(dt);
        }
    }
    for view in views {
        scene.request_view(view)?;
        for _ in 0..frames.max(1) {
            last = scene.frame(dt);
        }
    }
    Ok(last)
}

fn render(snapshot: &FrameSnapshot, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(snapshot)?,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Views { scene } => {
            let scene = build_scene(scene.as_deref())?;
            print!("{}", view_listing(&scene));
        }
        Commands::Check { scene: path } => {
            let scene = build_scene(Some(&path))?;
            println!(
                "{}: scene '{}' is valid ({} nodes, {} edges, {} views)",
                path.display(),
                scene.name(),
                scene.nodes().len(),
                scene.edges().len(),
                scene.view_names().count()
            );
        }
        Commands::Simulate {
            scene,
            views,
            frames,
            dt,
            format,
            output,
        } => {
            let mut scene = build_scene(scene.as_deref())?;
            let snapshot = simulate(&mut scene, &views, frames, dt)?;
            let text = render(&snapshot, format)?;
            match output {
                Some(path) => {
                    fs::write(&path, text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(
                        path = %path.display(),
                        frame = snapshot.frame,
                        "wrote snapshot"
                    );
                }
                None => print!("{text}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_simulate_with_defaults() {
        let cli = Cli::try_parse_from(["graphscene", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate {
                scene,
                views,
                frames,
                dt,
                format,
                output,
            } => {
                assert!(scene.is_none());
                assert!(views.is_empty());
                assert_eq!(frames, 120);
                assert_eq!(dt, 0.016);
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
            }
            _ => panic!("Expected Simulate command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_repeated_views() {
        let cli = Cli::try_parse_from([
            "graphscene", "simulate", "--view", "List", "--view", "Detail", "--format", "yaml",
            "-v",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate { views, format, .. } => {
                assert_eq!(views, vec!["List".to_string(), "Detail".to_string()]);
                assert_eq!(format, OutputFormat::Yaml);
            }
            _ => panic!("Expected Simulate command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn cli_requires_scene_for_check() {
        assert!(Cli::try_parse_from(["graphscene", "check"]).is_err());
    }

    #[test]
    fn lists_builtin_views() {
        let scene = build_scene(None).unwrap();
        insta::assert_snapshot!(view_listing(&scene).trim_end(), @r"
        Home (initial)
        List
        Detail
        Combined
        ");
    }

    #[test]
    fn simulate_visits_views_in_order() {
        let mut scene = build_scene(None).unwrap();
        let views = vec!["Detail".to_string(), "List".to_string()];
        let snapshot = simulate(&mut scene, &views, 10, 0.016).unwrap();
        assert_eq!(snapshot.active_view, "List");
        assert_eq!(snapshot.frame, 21);
    }

    #[test]
    fn simulate_rejects_unknown_view() {
        let mut scene = build_scene(None).unwrap();
        let views = vec!["Nowhere".to_string()];
        assert!(simulate(&mut scene, &views, 10, 0.016).is_err());
    }
}
