//! Sample programs.
//!
//! The first line of each sample lists the diagnostic codes it is expected to
//! produce, as in `// expect: E0101 E0103`, or `// expect: pass`.

use std::fs;
use std::path::PathBuf;

use super::*;

/// Expected codes of a sample, sorted, or `None` if it should pass.
fn expectations(source: &str) -> Result<Option<Vec<String>>> {
    let header = source
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("// expect:"))
        .ok_or_else(|| anyhow!("missing `// expect:` header"))?
        .trim();
    if header == "pass" {
        return Ok(None);
    }
    let mut codes: Vec<String> = header.split_whitespace().map(str::to_string).collect();
    codes.sort();
    Ok(Some(codes))
}

#[by_resources("tests/resources/**/*.tt")]
#[test]
fn sample(path: PathBuf) {
    let source = fs::read_to_string(&path)?;
    let filename = path.display().to_string();
    let config = Config {
        input: &source,
        filename: Some(&filename),
        ..Config::default()
    };
    let mut ctx = Context::new(config);
    match (expectations(&source)?, check(&mut ctx)?) {
        (None, Ok(checked)) => assert!(checked.is_pass()),
        (None, Err(diagnostics)) => {
            diagnostics.display()?;
            anyhow::bail!("`{filename}` should pass the check");
        }
        (Some(expected), Err(diagnostics)) => {
            let codes = diagnostics.codes();
            anyhow::ensure!(
                codes == expected,
                "`{filename}`: expected {expected:?}, got {codes:?}"
            );
        }
        (Some(expected), Ok(_)) => {
            anyhow::bail!("`{filename}` should fail with {expected:?}");
        }
    }
}
