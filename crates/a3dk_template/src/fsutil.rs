//! Filesystem helpers for mirroring source and template trees.

use a3dk_common::LinkMode;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists every file under `dir` recursively, as sorted `/`-separated
/// paths relative to `dir`.
pub fn list_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    walk(dir, dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(root, &path, files)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            let parts: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }
    Ok(())
}

/// Mirrors the contents of `src` into `dst`, copying or linking each file.
///
/// Directories are always created; only files are linked.
pub fn mirror_contents(src: &Path, dst: &Path, mode: LinkMode) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let path = entry?.path();
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dst.join(name);
        if path.is_dir() {
            mirror_contents(&path, &target, mode)?;
        } else {
            place_file(&path, &target, mode)?;
        }
    }
    Ok(())
}

/// Copies the whole tree under `src` into `dst`.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    mirror_contents(src, dst, LinkMode::Copy)
}

/// Removes `dir` and everything below it if it exists.
pub fn remove_tree(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn place_file(src: &Path, dst: &Path, mode: LinkMode) -> io::Result<()> {
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)?;
    }
    match mode {
        LinkMode::Copy => fs::copy(src, dst).map(|_| ()),
        LinkMode::Link => symlink(&absolute(src)?, dst),
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    path.canonicalize()
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}
