use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use eframe::egui;
use height_forge::{
    app,
    console::Console,
    gpu::HeadlessGpu,
    project::Project,
    renderer::{HeightField, SynthesisState},
    settings::{clamp_bounds, clamp_detail},
};

#[derive(Debug, Default, Clone)]
struct Cli {
    project: Option<PathBuf>,
    headless: bool,
    export: Option<PathBuf>,
    detail: Option<u32>,
    bounds: Option<f32>,
}

fn flag_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {name}"))
}

fn parse_cli(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--headless" => {
                cli.headless = true;
                i += 1;
            }
            "--project" => {
                cli.project = Some(PathBuf::from(flag_value(args, i, "--project")?));
                i += 2;
            }
            "--export" => {
                cli.export = Some(PathBuf::from(flag_value(args, i, "--export")?));
                i += 2;
            }
            "--detail" => {
                let v = flag_value(args, i, "--detail")?;
                cli.detail = Some(v.parse().map_err(|e| anyhow!("invalid --detail {v}: {e}"))?);
                i += 2;
            }
            "--bounds" => {
                let v = flag_value(args, i, "--bounds")?;
                cli.bounds = Some(v.parse().map_err(|e| anyhow!("invalid --bounds {v}: {e}"))?);
                i += 2;
            }
            other => {
                return Err(anyhow!(
                    "unknown argument: {other} (supported: --project <file.3dg>, --headless, --export <out.obj>, --detail <n>, --bounds <b>)"
                ));
            }
        }
    }
    Ok(cli)
}

fn run_headless_export(project_path: &Path, out_path: &Path, cli: &Cli) -> Result<()> {
    let gpu = HeadlessGpu::new()?;
    let Project {
        registry,
        mut settings,
    } = Project::load(project_path)?;
    if let Some(detail) = cli.detail {
        settings.detail = clamp_detail(detail);
    }
    if let Some(bounds) = cli.bounds {
        settings.bounds = clamp_bounds(bounds);
    }
    settings.sanitize();

    let mut console = Console::default();
    let mut height_field = HeightField::new(&gpu.device, &gpu.queue);
    height_field.synchronize(&registry, &mut console);
    if let SynthesisState::Error { diagnostic, .. } = height_field.synthesis_state() {
        bail!("height program failed to compile:\n{diagnostic}");
    }
    if height_field.mounted_program_id().is_none() {
        bail!("no height program mounted for {}", project_path.display());
    }

    height_field.export_obj(out_path, &registry, &settings, 0.0)?;
    println!("[headless] saved: {}", out_path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&argv)?;

    if cli.headless {
        let (Some(project), Some(export)) = (cli.project.as_deref(), cli.export.as_deref()) else {
            bail!("--headless requires --project <file.3dg> and --export <out.obj>");
        };
        return run_headless_export(project, export, &cli);
    }

    let mut console = Console::default();
    let (project, project_path) = match cli.project.clone() {
        Some(path) => match Project::load(&path) {
            Ok(mut project) => {
                if let Some(detail) = cli.detail {
                    project.settings.detail = clamp_detail(detail);
                }
                if let Some(bounds) = cli.bounds {
                    project.settings.bounds = clamp_bounds(bounds);
                }
                console.info(format!("[project] loaded {}", path.display()));
                (project, Some(path))
            }
            Err(e) => {
                console.error(format!("[startup] {e}; starting with an empty project"));
                (Project::default(), None)
            }
        },
        None => (Project::default(), None),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Height Forge",
        native_options,
        Box::new(move |cc| {
            let render_state = cc
                .wgpu_render_state
                .as_ref()
                .ok_or_else(|| anyhow!("wgpu render state not available"))?;
            Ok(Box::new(app::App::from_init(
                app::AppInit {
                    project,
                    project_path,
                    console,
                },
                render_state,
            )))
        }),
    )
    .map_err(|e| anyhow!("eframe run failed: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_cli_headless_export() {
        let cli = parse_cli(&args(&[
            "--headless",
            "--project",
            "dunes.3dg",
            "--export",
            "out.obj",
            "--detail",
            "128",
        ]))
        .unwrap();
        assert!(cli.headless);
        assert_eq!(cli.project.as_ref().unwrap(), &PathBuf::from("dunes.3dg"));
        assert_eq!(cli.export.as_ref().unwrap(), &PathBuf::from("out.obj"));
        assert_eq!(cli.detail, Some(128));
        assert_eq!(cli.bounds, None);
    }

    #[test]
    fn parse_cli_rejects_unknown_and_missing_values() {
        assert!(parse_cli(&args(&["--frobnicate"])).is_err());
        assert!(parse_cli(&args(&["--export"])).is_err());
        assert!(parse_cli(&args(&["--bounds", "wide"])).is_err());
    }
}
