#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_wire::ber::{BerObject, SliceSource};
use snmp_wire::varbind::{VarBind, VarBindList};

fuzz_target!(|data: &[u8]| {
    // Fuzz the generic object decoder (covers every tag the factory knows)
    let mut src = SliceSource::new(data);
    if let Ok(obj) = BerObject::decode(&mut src) {
        // Whatever decoded must re-encode without panicking, and the size
        // oracle must agree with the emitted byte count.
        let mut out = Vec::new();
        if obj.encode(&mut out).is_ok() {
            assert_eq!(out.len(), obj.encoded_len());
        }
    }

    // Fuzz the typed VarBind decoders
    let mut src = SliceSource::new(data);
    let _ = VarBind::decode(&mut src);

    let mut src = SliceSource::new(data);
    let _ = VarBindList::decode(&mut src);
});
