#![no_main]

use libfuzzer_sys::fuzz_target;
use flatscope::{types::field_index_to_offset, Builder, BuilderConfig, Table};

// Interprets the input as a sequence of builder operations and checks that whatever
// gets finished reads back.
fuzz_target!(|data: &[u8]| {
    let config = BuilderConfig::default()
        .with_initial_capacity(0)
        .with_max_buffer_size(1 << 16);
    let mut builder = Builder::with_config(config);
    let mut last = 0;
    let mut root = 0;

    for chunk in data.chunks(3) {
        let [op, a, b] = match *chunk {
            [op, a, b] => [op, a, b],
            _ => break,
        };
        let result = match op % 8 {
            0 => builder.start_object(usize::from(a % 8)),
            1 => builder.prepend_slot::<u16>(usize::from(a % 8), u16::from(b), 0),
            2 => builder.prepend_uoffset_slot(usize::from(a % 8), last, 0),
            3 => builder.end_object().map(|offset| {
                last = offset;
                root = offset;
            }),
            4 => builder
                .create_string(&"x".repeat(usize::from(a)))
                .map(|offset| last = offset),
            5 => builder
                .create_vector::<u8>(&vec![b; usize::from(a)])
                .map(|offset| last = offset),
            6 => builder.prep(1 << (a % 4), usize::from(b)),
            _ => builder.finish(root),
        };
        if result.is_err() {
            continue;
        }

        if let Ok(bytes) = builder.finished_bytes() {
            if root != 0 {
                let _ = Table::root(bytes).offset(field_index_to_offset(0));
            }
            break;
        }
    }
});
