use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;

fn main() {
    // (Variable, Type, Default value)
    let mut configs: HashMap<&str, (&str, &str)> = HashMap::from([
        ("PENDING_TRANSACTION_CAPACITY", ("usize", "10")),
        ("DEFAULT_CHANNEL", ("u8", "11")),
        ("DEFAULT_CHANNELS_SUPPORTED", ("u32", "0x07ff_f800")),
        ("DEFAULT_TX_POWER", ("u8", "0")),
        ("DEFAULT_CCA_MODE", ("u8", "1")),
        ("SOFTWARE_FCS", ("bool", "false")),
        ("TRANSACTION_PERSISTENCE_TIME", ("u16", "0x01f4")),
    ]);

    // Make sure we get rerun if needed
    println!("cargo:rerun-if-changed=build.rs");
    for name in configs.keys() {
        println!("cargo:rerun-if-env-changed=WPAN_{name}");
    }

    let mut data = String::new();

    for (var, value) in env::vars() {
        if let Some(name) = var.strip_prefix("WPAN_") {
            // discard from hashmap as a way of consuming the setting
            let Some((_, (ty, _))) = configs.remove_entry(name) else {
                panic!("Wrong configuration name {name}");
            };

            writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
        }
    }

    // Take the remaining configs and write the default value to the file
    for (name, (ty, value)) in configs.iter() {
        writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("config.rs");
    std::fs::write(out_file, data).unwrap();
}
