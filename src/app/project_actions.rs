use std::path::{Path, PathBuf};

use crate::{
    project::{self, PROJECT_EXTENSION, Project},
    settings::sample_count,
};

use super::types::App;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    SaveAs,
    ExportObj,
}

pub fn apply_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Open => {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Height project", &[PROJECT_EXTENSION])
                .pick_file()
            {
                load_project_from(app, path);
            }
        }
        MenuAction::Save => save_project(app, false),
        MenuAction::SaveAs => save_project(app, true),
        MenuAction::ExportObj => {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Wavefront OBJ", &["obj"])
                .set_file_name("surface.obj")
                .save_file()
            {
                export_obj_to(app, &path);
            }
        }
    }
}

/// Load `path` and swap it in only if the whole file parsed.
pub fn load_project_from(app: &mut App, path: PathBuf) {
    match Project::load(&path) {
        Ok(project) => {
            app.console
                .info(format!("[project] loaded {}", path.display()));
            app.replace_project(project, Some(path));
        }
        Err(e) => app.console.error(format!("[project] {e}")),
    }
}

fn save_project(app: &mut App, save_as: bool) {
    let path = match (&app.project_path, save_as) {
        (Some(path), false) => path.clone(),
        _ => {
            let Some(path) = rfd::FileDialog::new()
                .add_filter("Height project", &[PROJECT_EXTENSION])
                .set_file_name(format!("untitled.{PROJECT_EXTENSION}"))
                .save_file()
            else {
                return;
            };
            path
        }
    };

    match project::save(&path, &app.registry, &app.settings) {
        Ok(()) => {
            app.console.info(format!("[project] saved {}", path.display()));
            app.project_path = Some(path);
        }
        Err(e) => app.console.error(format!("[project] {e}")),
    }
}

pub fn export_obj_to(app: &mut App, path: &Path) {
    let time = app.clock.value();
    match app
        .height_field
        .export_obj(path, &app.registry, &app.settings, time)
    {
        Ok(()) => app.console.info(format!(
            "[export] wrote {} ({} vertices)",
            path.display(),
            sample_count(app.settings.detail)
        )),
        Err(e) => app.console.error(format!("[export] {e}")),
    }
}
