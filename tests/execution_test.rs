use anyhow::Result;
use snipcheck::{execution::Engine, language::Toolchain};

fn has_tool(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn inputs(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_python_hello_world() -> Result<()> {
    if !has_tool("python3") {
        println!("python3 not available; skipping");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(Toolchain::default(), dir.path())?;

    let r = engine.execute("python", r#"print("Hello, World!")"#, &[]).await;
    assert!(r.success, "{:?}", r.error);
    assert_eq!(r.output, "Hello, World!");
    assert_eq!(r.block, 1);
    Ok(())
}

#[tokio::test]
async fn test_python_consumes_inputs_in_order() -> Result<()> {
    if !has_tool("python3") {
        println!("python3 not available; skipping");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(Toolchain::default(), dir.path())?;

    let two_reads = "a = input()\nb = input('prompt: ')\nprint(a, b)";
    let r = engine.execute("python", two_reads, &inputs(&["a", "b"])).await;
    assert!(r.success, "{:?}", r.error);
    assert_eq!(r.output, "a b");

    let three_reads = "a = input()\nb = input()\nprint(a, b)\nc = input()\nprint(c)";
    let r = engine.execute("Python", three_reads, &inputs(&["a", "b"])).await;
    assert!(!r.success);
    assert!(r.error.as_deref().unwrap_or_default().starts_with("ReadExhausted"));
    assert_eq!(r.output, "a b");
    Ok(())
}

#[tokio::test]
async fn test_python_exception_and_exit() -> Result<()> {
    if !has_tool("python3") {
        println!("python3 not available; skipping");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(Toolchain::default(), dir.path())?;

    let r = engine.execute("python", "print('before')\n1 / 0", &[]).await;
    assert!(!r.success);
    assert!(r.error.unwrap().starts_with("ZeroDivisionError"));
    assert_eq!(r.output, "before");

    let r = engine.execute("python", "import sys\nprint('done')\nsys.exit(0)", &[]).await;
    assert!(r.success);
    assert_eq!(r.output, "done");

    let r = engine.execute("python", "import sys\nsys.exit(2)", &[]).await;
    assert!(!r.success);
    assert_eq!(r.error.as_deref(), Some("SystemExit: 2"));
    Ok(())
}

#[tokio::test]
async fn test_python_writes_past_stdout_redirect() -> Result<()> {
    if !has_tool("python3") {
        println!("python3 not available; skipping");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(Toolchain::default(), dir.path())?;

    let code = "import os, sys\nsys.__stdout__.write('x')\nsys.__stdout__.flush()\nos.write(1, b'y')\nprint('ok')";
    let r = engine.execute("python", code, &[]).await;
    assert!(r.success, "{:?}", r.error);
    assert_eq!(r.output, "ok");
    Ok(())
}

#[tokio::test]
async fn test_javascript_reads_stdin() -> Result<()> {
    if !has_tool("node") {
        println!("node not available; skipping");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(Toolchain::default(), dir.path())?;

    let src = "const lines = require('fs').readFileSync(0, 'utf8').split('\\n');\nconsole.log(lines.join('+'));";
    let r = engine.execute("javascript", src, &inputs(&["1", "2"])).await;
    assert!(r.success, "{:?}", r.error);
    assert_eq!(r.output, "1+2");
    assert_eq!(r.exit_code, Some(0));

    let r = engine.execute("js", "process.exit(4)", &[]).await;
    assert!(!r.success);
    assert_eq!(r.exit_code, Some(4));
    Ok(())
}

#[tokio::test]
async fn test_c_compile_then_run() -> Result<()> {
    if !has_tool("gcc") {
        println!("gcc not available; skipping");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(Toolchain::default(), dir.path())?;

    let src = "#include <stdio.h>\nint main(void) { int a, b; if (scanf(\"%d %d\", &a, &b) != 2) return 1; printf(\"%d\\n\", a + b); return 0; }";
    let r = engine.execute("c", src, &inputs(&["2", "40"])).await;
    assert!(r.success, "{:?}", r.error);
    assert_eq!(r.output, "42");

    let r = engine.execute("c", "int main(void) { return missing; }", &[]).await;
    assert!(!r.success);
    assert!(r.error.unwrap().starts_with("compilation exited with"));
    Ok(())
}
