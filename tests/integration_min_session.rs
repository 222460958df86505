// Drives the compiled binary through a PTY, exercising the real event loop
// and crossterm input handling.
//
// - Requires a TTY; expectrl allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_steps_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("stepviz");
    let log = std::env::temp_dir().join("stepviz-pty-test.log");
    let cmd = format!(
        "{} --viz floyd --no-autoplay --transition 0 --log-file {}",
        bin.display(),
        log.display()
    );

    let mut p = spawn(cmd)?;

    // let the app enter the alternate screen
    std::thread::sleep(Duration::from_millis(200));

    p.send("l")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("?")?;
    std::thread::sleep(Duration::from_millis(100));

    // q quits even with the help overlay open
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}
