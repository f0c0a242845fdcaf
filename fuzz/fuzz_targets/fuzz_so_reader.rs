#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any input must either parse or fail with an error, never panic
    if let Ok(so) = soxml::So::from_reader(data) {
        // A parsed document must serialize and parse again
        let xml = so.to_xml_string(false).expect("serialize parsed document");
        let again = soxml::So::from_xml_str(&xml).expect("reparse written document");
        assert_eq!(again.blocks().count(), so.blocks().count());
    }
});
