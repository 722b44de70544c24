#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_wire::Message;

fuzz_target!(|data: &[u8]| {
    // A parsed message must rebuild; mutation of random inputs must never panic.
    if let Ok(message) = Message::from_bytes(data) {
        let _ = message.to_bytes();
    }

    // The stream seam must agree with the buffer seam on acceptance.
    let _ = Message::read_from(data);
});
