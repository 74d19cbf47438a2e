//! Benchmark workloads
//!
//! Each workload performs the same countable work on every runtime the suite
//! is compared against, so the loops are written out literally rather than
//! with closed forms or iterator shortcuts. Results go through
//! [`black_box`] so the optimiser cannot fold the work away.

use crate::defaults;
use crate::models::WorkerResult;
use std::hint::black_box;

/// A labelled micro workload returning a checkable number
#[derive(Debug, Clone, Copy)]
pub struct MicroWorkload {
    pub label: &'static str,
    pub run: fn() -> u64,
    pub expected: u64,
}

/// The micro suite, in the order it is reported
pub const MICRO_SUITE: [MicroWorkload; 6] = [
    MicroWorkload {
        label: "Arithmetic (1M ops)",
        run: arithmetic,
        expected: 4_500_000,
    },
    MicroWorkload {
        label: "Array push (100k)",
        run: array_push,
        expected: 100_000,
    },
    MicroWorkload {
        label: "Nested loops (100x100)",
        run: nested_loops,
        expected: 25_502_500,
    },
    MicroWorkload {
        label: "String concat (10k)",
        run: string_concat,
        expected: 10_000,
    },
    MicroWorkload {
        label: "Recursion fib(25)",
        run: recursion,
        expected: 75_025,
    },
    MicroWorkload {
        label: "Functional chain",
        run: functional_chain,
        expected: 5_000,
    },
];

/// `sum += i % 10` over `1..=iterations`
pub fn count_mod_ten(iterations: u64) -> u64 {
    let mut sum = 0u64;
    for i in 1..=iterations {
        sum += black_box(i) % 10;
    }
    sum
}

/// Closed form of [`count_mod_ten`], used to check worker results
pub fn count_mod_ten_expected(iterations: u64) -> u64 {
    let full_cycles = iterations / 10;
    let rest = iterations % 10;
    full_cycles * 45 + rest * (rest + 1) / 2
}

pub fn arithmetic() -> u64 {
    count_mod_ten(defaults::ARITHMETIC_ITERATIONS)
}

/// Grow a vector one element at a time and return its length
pub fn array_push() -> u64 {
    let mut values = Vec::new();
    for i in 1..=defaults::ARRAY_PUSH_COUNT {
        values.push(black_box(i));
    }
    values.len() as u64
}

pub fn nested_loops() -> u64 {
    let size = defaults::NESTED_LOOP_SIZE;
    let mut sum = 0u64;
    for i in 1..=size {
        for j in 1..=size {
            sum += black_box(i) * j;
        }
    }
    sum
}

/// Append a single character repeatedly and return the final length
pub fn string_concat() -> u64 {
    let mut text = String::new();
    for _ in 0..defaults::STRING_CONCAT_COUNT {
        text = text + black_box("x");
    }
    text.len() as u64
}

/// Naive recursive Fibonacci, no memoization
pub fn fib(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    fib(n - 1) + fib(n - 2)
}

pub fn recursion() -> u64 {
    fib(black_box(defaults::FIB_N))
}

/// Build `1..=n`, keep the evens, double them, count what is left
pub fn functional_chain() -> u64 {
    let numbers: Vec<u64> = (1..=defaults::FUNCTIONAL_RANGE).collect();
    let filtered: Vec<u64> = numbers.into_iter().filter(|x| x % 2 == 0).collect();
    let mapped: Vec<u64> = filtered.into_iter().map(|x| black_box(x) * 2).collect();
    mapped.len() as u64
}

/// CPU-bound spawn worker: count to `iterations` and report the sum
pub fn cpu_worker(worker_id: u32, iterations: u64) -> WorkerResult {
    WorkerResult::sum(worker_id, count_mod_ten(iterations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_matches_closed_form() {
        assert_eq!(arithmetic(), count_mod_ten_expected(1_000_000));
        assert_eq!(arithmetic(), 4_500_000);
    }

    #[test]
    fn test_closed_form_partial_cycles() {
        for n in 0..=35 {
            assert_eq!(count_mod_ten(n), count_mod_ten_expected(n), "n = {}", n);
        }
    }

    #[test]
    fn test_array_push_length() {
        assert_eq!(array_push(), 100_000);
    }

    #[test]
    fn test_nested_loops_product_of_sums() {
        assert_eq!(nested_loops(), 5050 * 5050);
    }

    #[test]
    fn test_string_concat_length() {
        assert_eq!(string_concat(), 10_000);
    }

    #[test]
    fn test_fib() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(10), 55);
        assert_eq!(recursion(), 75_025);
    }

    #[test]
    fn test_functional_chain_count() {
        assert_eq!(functional_chain(), 5_000);
    }

    #[test]
    fn test_suite_expectations() {
        for workload in MICRO_SUITE.iter() {
            assert_eq!((workload.run)(), workload.expected, "{}", workload.label);
        }
    }

    #[test]
    fn test_cpu_worker() {
        let result = cpu_worker(3, 1_000);
        assert_eq!(result.worker_id, 3);
        assert_eq!(result.sum_value(), Some(4_500));
    }
}
