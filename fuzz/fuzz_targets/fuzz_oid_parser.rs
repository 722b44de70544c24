#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_wire::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // Fuzz OID from BER content bytes
    if let Ok(oid) = Oid::from_ber(data) {
        let ber = oid.to_ber();
        assert_eq!(Oid::from_ber(&ber).unwrap(), oid);
    }

    // Fuzz OID from dotted notation (if data is valid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Oid::parse(s);
    }
});
