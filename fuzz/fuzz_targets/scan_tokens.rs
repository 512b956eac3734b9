#![no_main]

use libfuzzer_sys::fuzz_target;
use teestream::split::{Chars, Lines, SingleBytes, Words};
use teestream::{ReplicaError, ScanConfig, Scanner};

fuzz_target!(|data: Vec<u8>| {
    let configs = [
        // Tiny buffer, forces growth and the token limit
        ScanConfig::new(1, 16).unwrap(),
        ScanConfig::new(7, 256).unwrap(),
        ScanConfig::default(),
    ];

    for config in configs {
        // Lines: tokens never contain a newline and never exceed the limit
        for line in Scanner::with_config(&data[..], Lines, config).unwrap() {
            match line {
                Ok(line) => {
                    assert!(!line.contains(&b'\n'));
                    assert!(line.len() < config.max_token_size());
                }
                Err(ReplicaError::TokenTooLarge { max, .. }) => {
                    assert_eq!(max, config.max_token_size())
                }
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        // Words: never empty, never contain ASCII whitespace
        for word in Scanner::with_config(&data[..], Words, config).unwrap().flatten() {
            assert!(!word.is_empty());
            assert!(!word.iter().any(u8::is_ascii_whitespace));
        }

        // Chars and single bytes cover the input exactly
        let chars: Vec<u8> = Scanner::with_config(&data[..], Chars, config)
            .unwrap()
            .flat_map(|c| c.unwrap())
            .collect();
        assert_eq!(chars, data);

        let bytes = Scanner::with_config(&data[..], SingleBytes, config)
            .unwrap()
            .count();
        assert_eq!(bytes, data.len());
    }
});
