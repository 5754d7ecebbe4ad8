#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use spectre::preprocess::preprocess;
use spectre::sampling::{read_peak_table_from, Xic};

/// Keep the sampled matrix small enough to stay within fuzzer memory limits
const MAX_BINS: usize = 1 << 16;

fuzz_target!(|data: &[u8]| {
    // Malformed tables must be rejected with an error, never a panic
    let Ok(table) = read_peak_table_from(Cursor::new(data)) else {
        return;
    };

    let (lo, hi) = table
        .masses
        .iter()
        .filter(|mass| mass.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &mass| {
            (lo.min(mass), hi.max(mass))
        });

    for resolution in [0.01, 1.0] {
        if lo <= hi && (hi - lo) / resolution > MAX_BINS as f64 {
            continue;
        }
        let Ok(xic) = Xic::from_scans(&table, resolution) else {
            continue;
        };

        // Short runs and odd peak widths are errors, not crashes
        if let Ok(corrected) = preprocess(&xic.data, 3.0) {
            assert!(corrected.values().iter().all(|&v| v > 0.0 || v.is_nan()));
        }
    }
});
