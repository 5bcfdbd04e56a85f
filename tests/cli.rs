use std::{env, fs, path::Path, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> String {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_salesight"));

    let output = Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute command");

    let stdout_str = std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str = std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    stdout_str.to_string()
}

fn write_fixtures(dir: &Path) {
    let mut records = Vec::new();
    let revenue = [100.0, 102.0, 98.0, 101.0, 500.0, 99.0, 103.0, 97.0];
    for (i, rev) in revenue.iter().enumerate() {
        let quantity = 10.0 + i as f64;
        records.push(format!(
            r#"{{"date":"2024-03-{day:02}","revenue":{rev},"quantity":{quantity},"spend":{spend},"discountRate":{disc},"orders":{orders},"sessions":200,"isEvent":{event},"sku":"{sku}"}}"#,
            day = i + 1,
            spend = 20.0 + i as f64,
            disc = 0.05 * (i % 3) as f64,
            orders = 4 + i,
            event = i == 4,
            sku = if i % 2 == 0 { "alpha" } else { "beta" },
        ));
    }
    fs::write(dir.join("records.json"), format!("[{}]", records.join(","))).expect("failed to write records");

    fs::write(
        dir.join("config.toml"),
        "[analytics]\noutlier_metrics = [\"revenue\"]\nmoving_average_window = 2\nforecast_horizon = 3\nmax_lag_days = 2\n",
    )
    .expect("failed to write config file");
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("salesight_basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");
    write_fixtures(&test_dir);

    let records = test_dir.join("records.json");
    let records = records.to_str().expect("failed to convert path to string");
    let config = test_dir.join("config.toml");
    let config = config.to_str().expect("failed to convert path to string");

    let base = |rest: &[&str]| -> Vec<String> {
        let mut args = vec!["--config".to_string(), config.to_string()];
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    };
    let run = |rest: &[&str]| {
        let args = base(rest);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_bin(&args)
    };

    let outliers = run(&["--format", "json", "outliers", "--input", records]);
    let outliers: serde_json::Value = serde_json::from_str(&outliers).expect("outliers output is not JSON");
    assert_eq!(outliers.as_array().map(Vec::len), Some(1));
    assert_eq!(outliers[0]["date"], "2024-03-05");

    let kpis = run(&["--format", "json", "kpis", "--input", records, "--previous", records]);
    let kpis: serde_json::Value = serde_json::from_str(&kpis).expect("kpis output is not JSON");
    assert_eq!(kpis["growth"]["totalRevenue"], 0.0);

    let forecast = run(&["--format", "json", "forecast", "--input", records]);
    let forecast: serde_json::Value = serde_json::from_str(&forecast).expect("forecast output is not JSON");
    assert_eq!(forecast["forecast"].as_array().map(Vec::len), Some(3));
    assert_eq!(forecast["forecast"][0]["date"], "2024-03-09");

    let lags = run(&["--format", "json", "lags", "--input", records, "--a", "spend", "--b", "revenue"]);
    let lags: serde_json::Value = serde_json::from_str(&lags).expect("lags output is not JSON");
    assert_eq!(lags["lags"].as_array().map(Vec::len), Some(5));

    let table = run(&["pareto", "--input", records, "--by", "sku"]);
    assert!(table.contains("alpha"));

    run(&["correlate", "--input", records, "--x", "spend", "--y", "revenue"]);
    run(&["elasticity", "--input", records, "--kind", "discount"]);
    run(&["elasticity", "--input", records]);
    run(&["event-uplift", "--input", records]);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn out_of_range_overrides_are_rejected() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("salesight_out_of_range");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");
    write_fixtures(&test_dir);

    let records = test_dir.join("records.json");
    let records = records.to_str().expect("failed to convert path to string");
    let config = test_dir.join("config.toml");
    let config = config.to_str().expect("failed to convert path to string");

    let rejected = [
        ("lags", vec!["--a", "revenue", "--b", "revenue", "--max-lag", "200000000000000"], "invalid lag options"),
        ("forecast", vec!["--horizon", "18446744073709551615"], "invalid forecast options"),
    ];
    for (command, extra, context) in rejected {
        let mut args = vec!["--config", config, command, "--input", records];
        args.extend(extra);
        let output = Command::new(env!("CARGO_BIN_EXE_salesight"))
            .args(&args)
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute command");

        let stderr_str = String::from_utf8_lossy(&output.stderr);
        assert_eq!(output.status.code(), Some(1), "{args:?}\nstderr:\n{stderr_str}");
        assert!(stderr_str.contains(context), "{args:?}\nstderr:\n{stderr_str}");
    }

    fs::remove_dir_all(&test_dir).ok();
}
