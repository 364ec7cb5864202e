use crate::core_storage::storage::DirEntry;
use crate::core_transfer::transfer::ListFormat;

/// MLST/MLSD facts followed by the name, without line terminator.
pub fn mlsx_facts(entry: &DirEntry, name: &str) -> String {
    format!(
        "Type={};Modify={};Size={}; {}",
        if entry.is_dir { "dir" } else { "file" },
        entry.modified,
        entry.size,
        name
    )
}

/// One listing line, CRLF terminated.
pub fn format_entry(format: ListFormat, entry: &DirEntry) -> String {
    match format {
        // EPLF: "/" marks a directory, "r" a retrievable file
        ListFormat::List if entry.is_dir => format!("+/,\t{}\r\n", entry.name),
        ListFormat::List => format!("+r,s{},\t{}\r\n", entry.size, entry.name),
        ListFormat::Nlst => format!("{}\r\n", entry.name),
        ListFormat::Mlsd => format!("{}\r\n", mlsx_facts(entry, &entry.name)),
    }
}
