#![no_main]

use libfuzzer_sys::fuzz_target;
use flatscope::{
    metadata::Metadata,
    types::{field_index_to_offset, UOffset},
    FinishedBuffer, Result, Table, Verifier, VerifierOptions,
};

fn check(verifier: &mut Verifier<'_>, table: UOffset) -> Result<()> {
    verifier.verify_field::<u64>(table, field_index_to_offset(0))?;
    verifier.verify_string_field(table, field_index_to_offset(1))?;
    verifier.verify_vector_field::<u16>(table, field_index_to_offset(2))?;
    verifier.verify_table_field(table, field_index_to_offset(3), check)?;
    Metadata::verify(verifier, table, field_index_to_offset(4))
}

fn read(table: Table<&[u8]>) {
    let _ = table.get_slot::<u64>(field_index_to_offset(0), 0);
    let _ = table.string_slot(field_index_to_offset(1));
    if let Some(values) = table.vector_slot::<u16>(field_index_to_offset(2)) {
        let _ = values.iter().count();
    }
    if let Some(child) = table.table_slot(field_index_to_offset(3)) {
        read(child);
    }
    let _ = Metadata::read(&table, field_index_to_offset(4));
}

fuzz_target!(|data: &[u8]| {
    let buffer = FinishedBuffer::from_mem(data.to_vec());
    if let Ok(root) = buffer.verify_with(None, VerifierOptions::default(), check) {
        read(root);
    }
    if let Ok(mut verifier) = Verifier::new(data, VerifierOptions::permissive()) {
        let _ = verifier.verify_root(None, check);
    }
});
