//! Property-based tests for the builder and the verifier.
//!
//! Uses proptest to check layout invariants and round-trips over randomized field sets,
//! and that the verifier never panics on arbitrary input.

use flatscope::{prelude::*, types::field_index_to_offset};
use proptest::prelude::*;

// ============================================================================
// Builder Layout Properties
// ============================================================================

mod layout_properties {
    use super::*;

    fn arb_alignment() -> impl Strategy<Value = usize> {
        prop_oneof![Just(1usize), Just(2), Just(4), Just(8)]
    }

    proptest! {
        #[test]
        fn prep_aligns_following_data(
            prefix in prop::collection::vec(any::<u8>(), 0..64),
            alignment in arb_alignment(),
            additional in 0usize..32,
        ) {
            let mut builder = Builder::with_capacity(1);
            for byte in &prefix {
                builder.prepend(*byte).unwrap();
            }
            builder.prep(alignment, additional).unwrap();

            prop_assert_eq!((builder.offset() as usize + additional) % alignment, 0);
            prop_assert!(builder.minalign() >= alignment);
            prop_assert!(builder.head() >= additional);
        }

        #[test]
        fn growth_preserves_written_bytes(
            data in prop::collection::vec(any::<u8>(), 0..512),
            capacity in 0usize..16,
        ) {
            let mut builder = Builder::with_capacity(capacity);
            for byte in &data {
                builder.prepend(*byte).unwrap();
            }

            let mut expected = data.clone();
            expected.reverse();
            prop_assert_eq!(builder.written_bytes(), expected.as_slice());
            prop_assert_eq!(builder.offset() as usize, data.len());
        }

        #[test]
        fn vectors_keep_length_and_order(values in prop::collection::vec(any::<i64>(), 0..64)) {
            let mut builder = Builder::new();
            let vector = builder.create_vector(values.as_slice()).unwrap();
            builder.start_object(1).unwrap();
            builder.prepend_uoffset_slot(0, vector, 0).unwrap();
            let root = builder.end_object().unwrap();
            builder.finish(root).unwrap();

            let table = Table::root(builder.finished_bytes().unwrap());
            let read = table.vector_slot::<i64>(field_index_to_offset(0)).unwrap();
            prop_assert_eq!(read.len(), values.len());
            prop_assert_eq!(read.iter().collect::<Vec<_>>(), values);
        }

        #[test]
        fn strings_are_terminated(value in ".{0,40}") {
            let mut builder = Builder::new();
            let string = builder.create_string(&value).unwrap();
            builder.start_object(1).unwrap();
            builder.prepend_uoffset_slot(0, string, 0).unwrap();
            let root = builder.end_object().unwrap();
            builder.finish(root).unwrap();

            let bytes = builder.finished_bytes().unwrap();
            let table = Table::root(bytes);
            let slot = field_index_to_offset(0);
            let field = table.pos() + u32::from(table.offset(slot));
            let start = table.indirect(field) as usize + 4;

            prop_assert_eq!(bytes[start + value.len()], 0);
            prop_assert_eq!(table.string_slot(slot).unwrap(), Some(value.as_str()));
        }
    }
}

// ============================================================================
// Round-trip Properties
// ============================================================================

mod roundtrip_properties {
    use super::*;

    #[derive(Debug, Clone)]
    struct Fields {
        small: Option<u8>,
        signed: Option<i32>,
        wide: Option<f64>,
        name: Option<String>,
        values: Option<Vec<u16>>,
    }

    fn arb_fields() -> impl Strategy<Value = Fields> {
        (
            prop::option::of(1u8..=u8::MAX),
            prop::option::of(any::<i32>().prop_filter("non-default", |v| *v != 0)),
            prop::option::of(-1.0e9f64..1.0e9f64),
            prop::option::of("[a-z0-9 ]{0,24}"),
            prop::option::of(prop::collection::vec(any::<u16>(), 0..16)),
        )
            .prop_map(|(small, signed, wide, name, values)| Fields {
                small,
                signed,
                wide,
                name,
                values,
            })
    }

    fn write(builder: &mut Builder, fields: &Fields) -> Result<UOffset> {
        let name = match &fields.name {
            Some(name) => builder.create_string(name)?,
            None => 0,
        };
        let values = match &fields.values {
            Some(values) => builder.create_vector(values.as_slice())?,
            None => 0,
        };

        builder.start_object(5)?;
        if let Some(wide) = fields.wide {
            builder.prepend_slot::<f64>(2, wide, 0.0)?;
        }
        if let Some(signed) = fields.signed {
            builder.prepend_slot::<i32>(1, signed, 0)?;
        }
        builder.prepend_uoffset_slot(3, name, 0)?;
        builder.prepend_uoffset_slot(4, values, 0)?;
        if let Some(small) = fields.small {
            builder.prepend_slot::<u8>(0, small, 0)?;
        }
        builder.end_object()
    }

    fn check(verifier: &mut Verifier<'_>, table: UOffset) -> Result<()> {
        let slot = field_index_to_offset;
        verifier.verify_field::<u8>(table, slot(0))?;
        verifier.verify_field::<i32>(table, slot(1))?;
        verifier.verify_field::<f64>(table, slot(2))?;
        verifier.verify_string_field(table, slot(3))?;
        verifier.verify_vector_field::<u16>(table, slot(4))?;
        Ok(())
    }

    proptest! {
        #[test]
        fn random_fields_roundtrip(records in prop::collection::vec(arb_fields(), 1..8)) {
            let mut builder = Builder::new();
            let mut offsets = Vec::new();
            for fields in &records {
                offsets.push(write(&mut builder, fields).unwrap());
            }
            let list = builder.create_offset_vector(&offsets).unwrap();
            builder.start_object(1).unwrap();
            builder.prepend_uoffset_slot(0, list, 0).unwrap();
            let root = builder.end_object().unwrap();
            builder.finish(root).unwrap();
            let buffer = builder.into_finished_buffer().unwrap();

            let root = buffer
                .verify_with(None, VerifierOptions::default(), |verifier, table| {
                    verifier.verify_table_vector_field(table, field_index_to_offset(0), check)
                })
                .unwrap();

            let tables = root.table_vector_slot(field_index_to_offset(0)).unwrap();
            prop_assert_eq!(tables.len(), records.len());
            let slot = field_index_to_offset;
            for (table, fields) in tables.iter().zip(&records) {
                prop_assert_eq!(table.get_slot::<u8>(slot(0), 0), fields.small.unwrap_or(0));
                prop_assert_eq!(table.get_slot::<i32>(slot(1), 0), fields.signed.unwrap_or(0));
                prop_assert_eq!(table.get_slot::<f64>(slot(2), 0.0), fields.wide.unwrap_or(0.0));
                prop_assert_eq!(table.string_slot(slot(3)).unwrap(), fields.name.as_deref());
                prop_assert_eq!(
                    table.vector_slot::<u16>(slot(4)).map(|v| v.iter().collect::<Vec<_>>()),
                    fields.values.clone()
                );
            }
        }

        #[test]
        fn capacity_does_not_change_output(fields in arb_fields(), capacity in 0usize..256) {
            let build = |capacity: usize| {
                let mut builder = Builder::with_capacity(capacity);
                let root = write(&mut builder, &fields).unwrap();
                builder.finish(root).unwrap();
                builder.finished_bytes().unwrap().to_vec()
            };
            prop_assert_eq!(build(capacity), build(1024));
        }
    }
}

// ============================================================================
// Verifier Robustness Properties
// ============================================================================

mod verifier_properties {
    use super::*;

    fn check(verifier: &mut Verifier<'_>, table: UOffset) -> Result<()> {
        let slot = field_index_to_offset;
        verifier.verify_field::<u32>(table, slot(0))?;
        verifier.verify_string_field(table, slot(1))?;
        verifier.verify_vector_field::<u16>(table, slot(2))?;
        verifier.verify_table_field(table, slot(3), check)?;
        verifier.verify_string_vector_field(table, slot(4))
    }

    /// Reads everything `check` accepted; must never panic.
    fn read_all(table: Table<&[u8]>) {
        let slot = field_index_to_offset;
        let _ = table.get_slot::<u32>(slot(0), 0);
        let _ = table.string_slot(slot(1));
        if let Some(values) = table.vector_slot::<u16>(slot(2)) {
            let _ = values.iter().count();
        }
        if let Some(child) = table.table_slot(slot(3)) {
            read_all(child);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..256)) {
            if let Ok(mut verifier) = Verifier::new(&data, VerifierOptions::default()) {
                if let Ok(root) = verifier.verify_root(None, check) {
                    read_all(Table::new(data.as_slice(), root));
                }
            }
        }

        #[test]
        fn corrupted_buffers_never_panic(
            seed in prop::collection::vec(any::<u8>(), 1..64),
            position in any::<prop::sample::Index>(),
            value in any::<u8>(),
        ) {
            let mut builder = Builder::new();
            let name = builder.create_byte_string(&seed).unwrap();
            let values = builder.create_vector::<u16>(&[1, 2, 3]).unwrap();
            builder.start_object(5).unwrap();
            builder.prepend_uoffset_slot(2, values, 0).unwrap();
            builder.prepend_uoffset_slot(1, name, 0).unwrap();
            builder.prepend_slot::<u32>(0, 17, 0).unwrap();
            let root = builder.end_object().unwrap();
            builder.finish(root).unwrap();

            let mut data = builder.finished_bytes().unwrap().to_vec();
            let index = position.index(data.len());
            data[index] = value;

            let options = VerifierOptions::permissive();
            if let Ok(mut verifier) = Verifier::new(&data, options) {
                if let Ok(root) = verifier.verify_root(None, check) {
                    let table = Table::new(data.as_slice(), root);
                    let _ = table.get_slot::<u32>(field_index_to_offset(0), 0);
                    let _ = table.byte_vector_slot(field_index_to_offset(1));
                }
            }
        }
    }
}
