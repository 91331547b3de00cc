//! Rendering a template directory into an export tree.

use crate::dictionary::Dictionary;
use crate::error::TemplateError;
use crate::fsutil::mirror_contents;
use crate::text::{self, TextError};
use a3dk_common::LinkMode;
use std::fs;
use std::path::Path;

/// Marker file: its directory receives the contents of every `SOURCES` entry.
pub const SOURCES_MARKER: &str = "_sources";

/// Renders a template set against a dictionary into an output directory.
pub trait TemplateRenderer {
    /// Renders `template_dir` with `dict` into `output_dir`.
    ///
    /// `mode` decides whether imported sources are copied or linked.
    fn render(
        &self,
        template_dir: &Path,
        dict: &Dictionary,
        output_dir: &Path,
        mode: LinkMode,
    ) -> Result<(), TemplateError>;
}

/// Mirrors a template directory, rendering names and text files.
///
/// - `<<KEY>>` in file and directory names is substituted.
/// - UTF-8 files are rendered with the [`text`](crate::text) language; other
///   files are copied verbatim.
/// - A directory holding a [`SOURCES_MARKER`] file receives the contents of
///   each `SOURCES` directory; the marker is not emitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectoryRenderer;

impl TemplateRenderer for DirectoryRenderer {
    fn render(
        &self,
        template_dir: &Path,
        dict: &Dictionary,
        output_dir: &Path,
        mode: LinkMode,
    ) -> Result<(), TemplateError> {
        if !template_dir.is_dir() {
            return Err(TemplateError::NotFound(template_dir.to_path_buf()));
        }
        tracing::debug!(
            template = %template_dir.display(),
            output = %output_dir.display(),
            %mode,
            "rendering template"
        );
        render_dir(template_dir, dict, output_dir, mode)
    }
}

fn render_dir(
    dir: &Path,
    dict: &Dictionary,
    out: &Path,
    mode: LinkMode,
) -> Result<(), TemplateError> {
    fs::create_dir_all(out).map_err(|e| TemplateError::io(out, e))?;

    let mut entries = fs::read_dir(dir)
        .and_then(|rd| rd.map(|e| e.map(|e| e.path())).collect::<Result<Vec<_>, _>>())
        .map_err(|e| TemplateError::io(dir, e))?;
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name == SOURCES_MARKER {
            for source in dict.sources() {
                mirror_contents(&source, out, mode).map_err(|e| TemplateError::io(&source, e))?;
            }
            continue;
        }

        let target = out.join(render_text(&name, dict, &path)?);
        if path.is_dir() {
            render_dir(&path, dict, &target, mode)?;
        } else {
            render_file(&path, dict, &target)?;
        }
    }
    Ok(())
}

fn render_file(path: &Path, dict: &Dictionary, target: &Path) -> Result<(), TemplateError> {
    let bytes = fs::read(path).map_err(|e| TemplateError::io(path, e))?;
    let contents = match String::from_utf8(bytes) {
        Ok(template) => render_text(&template, dict, path)?.into_bytes(),
        Err(raw) => raw.into_bytes(),
    };
    // A linked source from an earlier export must not be written through.
    if target
        .symlink_metadata()
        .is_ok_and(|meta| meta.file_type().is_symlink())
    {
        fs::remove_file(target).map_err(|e| TemplateError::io(target, e))?;
    }
    fs::write(target, contents).map_err(|e| TemplateError::io(target, e))
}

fn render_text(template: &str, dict: &Dictionary, path: &Path) -> Result<String, TemplateError> {
    text::render(template, &[dict.entries()]).map_err(|e| match e {
        TextError::UnknownKey(key) => TemplateError::UnknownKey {
            path: path.to_path_buf(),
            key,
        },
        TextError::Syntax(message) => TemplateError::Syntax {
            path: path.to_path_buf(),
            message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use tempfile::TempDir;

    #[derive(Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    struct Desc {
        name: String,
        sources: Vec<String>,
        regs: Vec<Reg>,
    }

    #[derive(Serialize)]
    struct Reg {
        rid: usize,
    }

    fn template() -> TempDir {
        let tpl = TempDir::new().unwrap();
        let core = tpl.path().join("a3_<<NAME>>_v1_00_a");
        fs::create_dir_all(core.join("hdl")).unwrap();
        fs::write(
            core.join("hdl").join("a3_<<NAME>>.vhd"),
            "entity <<NAME>> is\n<<generate for REGS>>  reg_<<rid>>\n<<end generate>>end;\n",
        )
        .unwrap();
        fs::write(core.join("hdl").join(SOURCES_MARKER), "").unwrap();
        fs::write(core.join("logo.bin"), [0xff, 0xfe, 0x00]).unwrap();
        tpl
    }

    fn sources() -> TempDir {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("fir.vhd"), "-- user source <<not a key>>").unwrap();
        src
    }

    fn dict(src: &Path) -> Dictionary {
        Dictionary::from_descriptor(&Desc {
            name: "fir".into(),
            sources: vec![src.to_string_lossy().into_owned()],
            regs: vec![Reg { rid: 0 }, Reg { rid: 1 }],
        })
        .unwrap()
    }

    #[test]
    fn renders_names_text_and_sources() {
        let tpl = template();
        let src = sources();
        let out = TempDir::new().unwrap();
        DirectoryRenderer
            .render(tpl.path(), &dict(src.path()), out.path(), LinkMode::Copy)
            .unwrap();

        let hdl = out.path().join("a3_fir_v1_00_a").join("hdl");
        assert_eq!(
            fs::read_to_string(hdl.join("a3_fir.vhd")).unwrap(),
            "entity fir is\n  reg_0\n  reg_1\nend;\n"
        );
        // Imported sources are not rendered.
        assert_eq!(
            fs::read_to_string(hdl.join("fir.vhd")).unwrap(),
            "-- user source <<not a key>>"
        );
        assert!(!hdl.join(SOURCES_MARKER).exists());
        assert_eq!(
            fs::read(out.path().join("a3_fir_v1_00_a").join("logo.bin")).unwrap(),
            vec![0xff, 0xfe, 0x00]
        );
    }

    #[cfg(unix)]
    #[test]
    fn link_mode_links_sources() {
        let tpl = template();
        let src = sources();
        let out = TempDir::new().unwrap();
        DirectoryRenderer
            .render(tpl.path(), &dict(src.path()), out.path(), LinkMode::Link)
            .unwrap();
        let imported = out.path().join("a3_fir_v1_00_a").join("hdl").join("fir.vhd");
        assert!(imported.symlink_metadata().unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn relinking_leaves_user_sources_untouched() {
        let tpl = TempDir::new().unwrap();
        let hdl = tpl.path().join("hdl");
        fs::create_dir_all(&hdl).unwrap();
        fs::write(hdl.join(SOURCES_MARKER), "").unwrap();
        fs::write(hdl.join("<<NAME>>_pkg.vhd"), "-- generated pkg for <<NAME>>").unwrap();
        let src = TempDir::new().unwrap();
        let user = src.path().join("fir_pkg.vhd");
        fs::write(&user, "USER CODE").unwrap();
        let out = TempDir::new().unwrap();

        for _ in 0..2 {
            DirectoryRenderer
                .render(tpl.path(), &dict(src.path()), out.path(), LinkMode::Link)
                .unwrap();
        }

        assert_eq!(fs::read_to_string(&user).unwrap(), "USER CODE");
        // Imported sources are placed after the rendered file and win.
        let placed = out.path().join("hdl").join("fir_pkg.vhd");
        assert!(placed.symlink_metadata().unwrap().file_type().is_symlink());
    }

    #[test]
    fn missing_template_dir() {
        let out = TempDir::new().unwrap();
        let err = DirectoryRenderer
            .render(
                Path::new("/nonexistent/templates/x"),
                &Dictionary::default(),
                out.path(),
                LinkMode::Copy,
            )
            .unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn unknown_key_names_file() {
        let tpl = TempDir::new().unwrap();
        fs::write(tpl.path().join("x.tcl"), "set part <<PART>>").unwrap();
        let out = TempDir::new().unwrap();
        let err = DirectoryRenderer
            .render(tpl.path(), &Dictionary::default(), out.path(), LinkMode::Copy)
            .unwrap_err();
        match err {
            TemplateError::UnknownKey { path, key } => {
                assert_eq!(key, "PART");
                assert!(path.ends_with("x.tcl"));
            }
            other => panic!("expected UnknownKey, got {other}"),
        }
    }
}
