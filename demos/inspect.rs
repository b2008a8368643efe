use clap::{Arg, Command};
use dbpf_rs::package::Package;
use std::path::PathBuf;

fn main() {
    let matches = Command::new("dbpf-inspect")
        .about("Lists the entries in a DBPF package")
        .arg(
            Arg::new("package")
                .help("Path to the .package/.dat file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tgi")
                .help("Dump bytes for a single entry given as type:group:instance (hex)")
                .long("tgi"),
        )
        .get_matches();

    let package_path: PathBuf = matches.get_one::<PathBuf>("package").unwrap().clone();

    println!("Parsing {}", package_path.display());
    let mut package = Package::open(&package_path).unwrap_or_else(|e| {
        println!("Failed to parse package: {e}");
        std::process::exit(1)
    });

    println!("group_id: {:#010X}", package.group_id());
    println!("entries: {}", package.entries().len());

    if let Some(tgi_str) = matches.get_one::<String>("tgi") {
        let tgi = parse_tgi(tgi_str).unwrap_or_else(|| {
            println!("Expected tgi as type:group:instance in hex");
            std::process::exit(1)
        });
        match package.get_bytes_by_tgi(tgi) {
            Ok(bytes) => {
                println!("{} bytes", bytes.len());
                println!("first bytes: {:?}", bytes.iter().take(32).collect::<Vec<_>>());
            }
            Err(e) => println!("Failed to read entry: {e}"),
        }
        return;
    }

    for entry in package.entries() {
        let tgi = entry.global_tgi;
        println!(
            "{:#010X}:{:#010X}:{:#010X} offset={} size={}",
            tgi.type_id, tgi.group_id, tgi.instance_id, entry.file_offset, entry.file_size
        );
    }
}

fn parse_tgi(s: &str) -> Option<dbpf_rs::ResourceKey> {
    let mut parts = s.split(':');
    let type_id = u32::from_str_radix(parts.next()?.trim_start_matches("0x"), 16).ok()?;
    let group_id = u32::from_str_radix(parts.next()?.trim_start_matches("0x"), 16).ok()?;
    let instance_id = u32::from_str_radix(parts.next()?.trim_start_matches("0x"), 16).ok()?;
    Some(dbpf_rs::ResourceKey::new(type_id, group_id, instance_id, 0))
}
