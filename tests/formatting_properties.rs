//! Property tests for result line formatting

use proptest::prelude::*;
use regex::Regex;
use runtime_bench::{
    models::Measurement,
    output::{average_line, measurement_line, memory_line, OutputFormatterFactory},
};

fn strip_ansi(text: &str) -> String {
    Regex::new(r"\x1b\[[0-9;]*m").unwrap().replace_all(text, "").into_owned()
}

proptest! {
    #[test]
    fn measurement_lines_have_one_decimal(label in "[A-Za-z][A-Za-z0-9 ()]{0,30}", ms in 0.0f64..1.0e7) {
        let line = measurement_line(&Measurement::from_millis(label.clone(), ms));
        let pattern = Regex::new(r"^(.+): (\d+\.\d)ms$").unwrap();
        let captures = pattern.captures(&line).unwrap();

        prop_assert_eq!(&captures[1], label.as_str());
        let printed: f64 = captures[2].parse().unwrap();
        prop_assert!((printed - ms).abs() <= 0.05 + ms * 1e-12);
    }

    #[test]
    fn elapsed_is_never_negative(ms in proptest::num::f64::ANY) {
        let measurement = Measurement::from_millis("x", ms);
        prop_assert!(measurement.elapsed_ms >= 0.0);
        prop_assert!(measurement.elapsed_ms.is_finite());
    }

    #[test]
    fn averages_have_three_decimals(ms in 0.0f64..1.0e6) {
        let line = average_line("Average per worker", ms);
        let pattern = Regex::new(r"^Average per worker: \d+\.\d{3}ms$").unwrap();
        prop_assert!(pattern.is_match(&line), "{}", line);
    }

    #[test]
    fn memory_lines_are_megabytes(bytes in 0u64..(1u64 << 40)) {
        let line = memory_line("Peak memory", bytes);
        let pattern = Regex::new(r"^Peak memory: (\d+\.\d) MB$").unwrap();
        let captures = pattern.captures(&line).unwrap();
        let printed: f64 = captures[1].parse().unwrap();
        prop_assert!((printed - bytes as f64 / 1048576.0).abs() <= 0.05 + 1e-9);
    }

    #[test]
    fn colored_lines_match_plain_after_stripping(label in "[A-Za-z][A-Za-z ]{0,20}", ms in 0.0f64..1.0e5) {
        colored::control::set_override(true);
        let measurement = Measurement::from_millis(label, ms);
        let plain = OutputFormatterFactory::create_formatter(false).format_measurement(&measurement).unwrap();
        let colored = OutputFormatterFactory::create_formatter(true).format_measurement(&measurement).unwrap();
        prop_assert_eq!(strip_ansi(&colored), plain);
    }
}
