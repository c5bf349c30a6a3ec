mod common;

use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::time::Duration;
use tempfile::TempDir;

fn safecity() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_safecity"));
    command.env("RUST_LOG", "warn");
    command
}

fn run(command: &mut Command) -> Output {
    command.output().expect("run safecity")
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn spawn_server(data_dir: &Path, port: u16) -> Child {
    safecity()
        .args(["serve", "--host", "127.0.0.1", "--port", &port.to_string()])
        .arg("--data-dir")
        .arg(data_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn server")
}

struct ServerGuard(Child);

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn test_summary_reads_default_data_layout() {
    let workdir = TempDir::new().unwrap();
    let data_dir = workdir.path().join("Data");
    std::fs::create_dir(&data_dir).unwrap();
    common::write_data_dir(&data_dir);

    let output = run(safecity().current_dir(workdir.path()).arg("summary"));
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Barnet") && lines[0].ends_with("30"));
    assert!(lines[2].starts_with("Westminster") && lines[2].ends_with("453"));
    assert!(lines[3].starts_with("Total") && lines[3].ends_with("668"));
}

#[test]
fn test_summary_without_crime_data_fails() {
    let workdir = TempDir::new().unwrap();

    let output = run(safecity()
        .arg("summary")
        .arg("--data-dir")
        .arg(workdir.path().join("missing")));
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_export_without_crime_data_fails() {
    let workdir = TempDir::new().unwrap();
    let output_dir = workdir.path().join("out");

    let output = run(safecity()
        .arg("export")
        .arg("--data-dir")
        .arg(workdir.path().join("missing"))
        .arg("--output-path")
        .arg(&output_dir));
    assert_eq!(output.status.code(), Some(1));
    assert!(!output_dir.exists());
}

#[test]
fn test_export_writes_files() {
    let data_dir = TempDir::new().unwrap();
    common::write_data_dir(data_dir.path());
    let output_dir = TempDir::new().unwrap();

    let output = run(safecity()
        .arg("export")
        .arg("--data-dir")
        .arg(data_dir.path())
        .arg("--output-path")
        .arg(output_dir.path()));
    assert_eq!(output.status.code(), Some(0));
    assert!(output_dir.path().join("crime_long.csv").exists());
    assert!(output_dir.path().join("borough_totals.csv").exists());
}

#[test]
fn test_malformed_data_fails_startup() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        data_dir.path().join("crime_cleaned.csv"),
        "BoroughName,MajorText,MinorText,201904\nCamden,Theft,Shoplifting,-3\n",
    )
    .unwrap();

    let output = run(safecity()
        .arg("serve")
        .arg("--port")
        .arg(free_port().to_string())
        .arg("--data-dir")
        .arg(data_dir.path()));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_probe_without_server_times_out() {
    let url = format!("http://127.0.0.1:{}/healthz", free_port());

    let output = run(safecity().args(["probe", "--url", &url, "--attempts", "2", "--interval-ms", "10"]));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_serve_on_taken_port_fails() {
    let data_dir = TempDir::new().unwrap();
    common::write_data_dir(data_dir.path());
    let taken = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let output = run(safecity()
        .args(["serve", "--host", "127.0.0.1", "--port", &port.to_string()])
        .arg("--data-dir")
        .arg(data_dir.path()));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_serve_stays_up_until_terminated() {
    let data_dir = TempDir::new().unwrap();
    common::write_data_dir(data_dir.path());
    let port = free_port();
    let mut server = ServerGuard(spawn_server(data_dir.path(), port));

    let url = format!("http://127.0.0.1:{}/healthz", port);
    let output = run(safecity().args(["probe", "--url", &url, "--attempts", "100", "--interval-ms", "100"]));
    assert_eq!(output.status.code(), Some(0), "server never became ready");

    std::thread::sleep(Duration::from_millis(300));
    assert!(server.0.try_wait().unwrap().is_none(), "serve exited early");

    #[cfg(unix)]
    {
        let status = Command::new("kill")
            .args(["-TERM", &server.0.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let mut exit = None;
        for _ in 0..50 {
            if let Some(status) = server.0.try_wait().unwrap() {
                exit = Some(status);
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        assert_eq!(exit.and_then(|s| s.code()), Some(0));
    }
}
