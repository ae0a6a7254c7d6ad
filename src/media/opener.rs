use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        // The empty argument is the window title expected by `start`
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Opens `path` with the default application of the desktop session
pub fn open_with_default_app(path: &Path) -> Result<()> {
    let mut cmd = opener_command(path);
    let program = cmd.get_program().to_string_lossy().into_owned();

    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!("'{program}' not found. Cannot open {path:?} with the default player.");
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to run '{program}'")),
    };

    if !status.success() {
        bail!("'{program}' exited with {status} while opening {path:?}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_command_targets_path() {
        let cmd = opener_command(Path::new("/media/show.mkv"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args.last().map(String::as_str), Some("/media/show.mkv"));
    }
}
