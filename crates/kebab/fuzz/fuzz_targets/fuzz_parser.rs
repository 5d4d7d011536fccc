//! Fuzz target for the ledger file reader.
//!
//! The reader must never panic on malformed input, whatever delimiter it
//! detects, and a table it accepts must normalize without panicking.

#![no_main]

use kebab::input::Parser;
use kebab::{ColumnNames, NormalizerConfig, Normalizer};
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let parser = Parser::new();
            if let Ok((table, _, _)) = parser.parse_file(temp_file.path()) {
                let normalizer =
                    Normalizer::new(ColumnNames::default(), NormalizerConfig::default());
                let _ = normalizer.normalize_table(&table);
            }
        }
    }
});
