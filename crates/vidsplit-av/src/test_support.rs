//! Fake tool scripts for tests that need a real subprocess.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A stand-in for ffmpeg.
///
/// With only `-i <input>` it prints a banner and `Duration: <duration>` to
/// stderr and exits 1, like the real tool. Otherwise it appends its argument
/// list to `log`, then writes `chunk_bytes` zero bytes to the last argument.
/// An output path containing `fail_marker` makes it exit 1 before writing.
pub fn fake_ffmpeg(
    dir: &Path,
    duration: &str,
    chunk_bytes: usize,
    log: &Path,
    fail_marker: Option<&str>,
) -> PathBuf {
    let fail_marker = fail_marker.unwrap_or("__never_fail__");
    let body = format!(
        r#"if [ "$#" -eq 2 ] && [ "$1" = "-i" ]; then
  echo "ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers" >&2
  echo "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from '$2':" >&2
  echo "  Duration: {duration}, start: 0.000000, bitrate: 1204 kb/s" >&2
  echo "At least one output file must be specified" >&2
  exit 1
fi
for out; do :; done
echo "$@" >> "{log}"
case "$out" in
  *{fail_marker}*) echo "$out: Conversion failed!" >&2; exit 1 ;;
esac
head -c {chunk_bytes} /dev/zero > "$out""#,
        log = log.display(),
    );
    write_script(dir, "ffmpeg", &body)
}
