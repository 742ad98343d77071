use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

fn termon<S: AsRef<OsStr>>(args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_termon"))
        .args(args)
        // Keep a developer's own config file out of the picture.
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("termon-cli-tests"))
        .output()
        .expect("failed to launch termon")
}

#[test]
fn test_non_numeric_positional_exits_with_usage() {
    let out = termon(&["abc"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid command line argument 'abc'"), "{stderr}");
    assert!(stderr.contains("Usage: termon [samples [tdelay]]"), "{stderr}");
    assert!(out.stdout.is_empty(), "sampling must not start");
}

#[test]
fn test_bad_flag_value_exits_with_usage() {
    let out = termon(&["--samples=lots"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_help_prints_usage() {
    let out = termon(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Usage: termon"));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_argument_exits_with_usage() {
    use std::os::unix::ffi::OsStrExt;

    let out = termon(&[OsStr::from_bytes(b"\xff")]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid command line argument"), "{stderr}");
    assert!(stderr.contains("Usage: termon"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
    assert!(out.stdout.is_empty());
}

/// A clock file that is a FIFO with no writer blocks its reader forever. The
/// round must time out and the process must still exit.
#[cfg(target_os = "linux")]
#[test]
fn test_stuck_sampler_still_exits() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let home = tempfile::tempdir().unwrap();
    let fifo = home.path().join("cpuinfo_max_freq");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).unwrap();
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0, "mkfifo failed");

    let config_dir = home.path().join("termon");
    std::fs::create_dir(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("termon.toml"),
        format!(
            "[sampling]\ntimeout_ms = 300\n\n[sources]\ncpufreq_max = '{}'\n",
            fifo.display()
        ),
    )
    .unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_termon"))
        .args(["--samples=2", "--tdelay=1000", "--cores"])
        .env("XDG_CONFIG_HOME", home.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch termon");

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if started.elapsed() > Duration::from_secs(10) {
            child.kill().unwrap();
            child.wait().unwrap();
            panic!("termon did not exit after its sampler timed out");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert_eq!(status.code(), Some(1));
    let out = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("did not report within 300 ms"), "{stderr}");
}
