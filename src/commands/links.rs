// ABOUTME: Link check command implementation.
// ABOUTME: Prints one line per broken reference and a summary.

use std::path::Path;

use webroll::error::Result;
use webroll::links::{Remedy, scan};

pub fn links(root: &Path, fix: bool, skip_dirs: &[&str]) -> Result<()> {
    if fix {
        println!("Fix mode: case mismatches will be rewritten");
    } else {
        println!("Dry run: no files will be changed (use --fix to apply)");
    }

    let report = scan(root, fix, skip_dirs)?;

    for broken in &report.broken {
        let file = broken
            .file
            .strip_prefix(root)
            .unwrap_or(&broken.file)
            .display();
        println!("[-] Broken link in {file}: {}", broken.reference);

        match &broken.remedy {
            Remedy::CaseMismatch { from, to, fixed } => {
                println!("    [+] Case mismatch: '{from}' should be '{to}'");
                if let Some(value) = fixed {
                    println!("    [!] Fixed: now {value}");
                }
            }
            Remedy::NotFound => println!("    [?] No matching file in directory"),
            Remedy::MissingDirectory(dir) => {
                println!("    [?] Directory does not exist: {}", dir.display())
            }
        }
    }

    println!();
    println!("Files checked: {}", report.files_checked);
    println!("Broken links found: {}", report.broken.len());
    if fix {
        println!(
            "Fixes applied: {} in {} file(s)",
            report.fixes_applied(),
            report.rewritten.len()
        );
    }
    Ok(())
}
