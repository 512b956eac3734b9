#![no_main]

use libfuzzer_sys::fuzz_target;
use teestream::{DuplicatorChain, HashingSink, copy_to_sinks, digest};

fuzz_target!(|input: (u8, u16, Vec<u8>)| {
    let (sinks, chunk, data) = input;
    let sinks = usize::from(sinks % 8);
    let chunk = usize::from(chunk).max(1);

    // Chain: every sink holds the source, downstream sees it unchanged
    let mut copies = vec![Vec::<u8>::new(); sinks];
    let mut chain = DuplicatorChain::new(&data[..]);
    for copy in copies.iter_mut() {
        chain = chain.with_sink(copy);
    }
    let drained = chain.drain(chunk).unwrap();
    drop(chain);

    assert_eq!(drained, data.len() as u64);
    for copy in &copies {
        assert_eq!(copy, &data);
    }

    // Eager copy agrees with the chain
    let mut hashed: Vec<_> = (0..sinks).map(|_| HashingSink::new(std::io::sink())).collect();
    let copied = copy_to_sinks(&mut &data[..], &mut hashed).unwrap();
    assert_eq!(copied, drained);

    let expected = digest(&data);
    for sink in &hashed {
        assert_eq!(sink.digest(), expected);
    }
});
