//! Offline end-to-end scenarios.
//!
//! These exercise the binary without touching the network: argument errors,
//! unreachable targets, empty manifests, and format selection.

use super::harness::{TestContext, ensure_dir, parse_json, read_file, write_file};

pub struct Scenario {
    pub name: &'static str,
    pub run: fn(&TestContext) -> Result<(), String>,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "help_output",
            run: scenario_help,
        },
        Scenario {
            name: "version_output",
            run: scenario_version,
        },
        Scenario {
            name: "no_args_error",
            run: scenario_no_args,
        },
        Scenario {
            name: "invalid_format",
            run: scenario_invalid_format,
        },
        Scenario {
            name: "unreachable_target",
            run: scenario_unreachable_target,
        },
        Scenario {
            name: "non_citable_url",
            run: scenario_non_citable_url,
        },
        Scenario {
            name: "empty_requirements_bibtex",
            run: scenario_empty_requirements_bibtex,
        },
        Scenario {
            name: "empty_requirements_json",
            run: scenario_empty_requirements_json,
        },
        Scenario {
            name: "directory_without_yaml",
            run: scenario_directory_without_yaml,
        },
        Scenario {
            name: "output_file",
            run: scenario_output_file,
        },
    ]
}

fn scenario_help(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("help")?;
    let output = ctx.run_snakecite(&env, &["--help"], &env.root)?;
    output.assert_success()?;
    output.assert_stdout_contains("--format")?;
    output.assert_stdout_contains("--github-token")?;
    Ok(())
}

fn scenario_version(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("version")?;
    let output = ctx.run_snakecite(&env, &["--version"], &env.root)?;
    output.assert_success()?;
    output.assert_stdout_contains("snakecite")?;
    Ok(())
}

fn scenario_no_args(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("no-args")?;
    let output = ctx.run_snakecite(&env, &[], &env.root)?;
    output.assert_failure()?;
    output.assert_stderr_contains("required")?;
    Ok(())
}

fn scenario_invalid_format(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("invalid-format")?;
    let output = ctx.run_snakecite(&env, &["requirements.txt", "--format", "yaml"], &env.root)?;
    output.assert_failure()?;
    output.assert_stderr_contains("Unknown format")?;
    Ok(())
}

fn scenario_unreachable_target(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("unreachable")?;
    let output = ctx.run_snakecite(&env, &["does-not-exist.txt"], &env.root)?;
    output.assert_failure()?;
    output.assert_stderr_contains("unreachable")?;
    Ok(())
}

fn scenario_non_citable_url(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("non-citable-url")?;
    let output = ctx.run_snakecite(&env, &["https://example.com/some/page"], &env.root)?;
    output.assert_success()?;
    output.assert_stderr_contains("Unable to cite")?;
    if !output.stdout.trim().is_empty() {
        return Err(format!("Expected empty stdout, got: {}", output.stdout));
    }
    Ok(())
}

fn scenario_empty_requirements_bibtex(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("empty-reqs-bibtex")?;
    let manifest = env.root.join("requirements.txt");
    write_file(&manifest, "# only comments here\n-r dev.txt\n")?;

    let output = ctx.run_snakecite(&env, &["requirements.txt"], &env.root)?;
    output.assert_success()?;
    if !output.stdout.trim().is_empty() {
        return Err(format!("Expected empty stdout, got: {}", output.stdout));
    }
    Ok(())
}

fn scenario_empty_requirements_json(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("empty-reqs-json")?;
    let manifest = env.root.join("requirements.txt");
    write_file(&manifest, "# nothing pinned\n")?;

    let output = ctx.run_snakecite(
        &env,
        &["requirements.txt", "--format", "json"],
        &env.root,
    )?;
    output.assert_success()?;
    let value = parse_json(&output.stdout)?;
    if value.as_array().map(|arr| arr.is_empty()) != Some(true) {
        return Err("Expected empty JSON array".to_string());
    }
    Ok(())
}

fn scenario_directory_without_yaml(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("dir-no-yaml")?;
    let workflow = env.root.join("workflow");
    ensure_dir(&workflow)?;
    write_file(&workflow.join("Snakefile"), "rule all:\n    input: []\n")?;

    let output = ctx.run_snakecite(&env, &["workflow"], &env.root)?;
    output.assert_success()?;
    if !output.stdout.trim().is_empty() {
        return Err(format!("Expected empty stdout, got: {}", output.stdout));
    }
    Ok(())
}

fn scenario_output_file(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("output-file")?;
    let manifest = env.root.join("requirements.txt");
    write_file(&manifest, "# empty\n")?;

    let output = ctx.run_snakecite(
        &env,
        &[
            "requirements.txt",
            "--format",
            "json",
            "-o",
            "citations.json",
        ],
        &env.root,
    )?;
    output.assert_success()?;

    let written = read_file(&env.root.join("citations.json"))?;
    let value = parse_json(&written)?;
    if value.as_array().map(|arr| arr.is_empty()) != Some(true) {
        return Err("Expected empty JSON array in output file".to_string());
    }
    Ok(())
}
