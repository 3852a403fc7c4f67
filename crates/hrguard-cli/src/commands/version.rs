//! Version command implementation.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    println!("hrguard {VERSION}");
    println!();
    println!("Role-based access control for HR records.");
    println!();
    println!("Build info:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
}
