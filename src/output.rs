use colored::Colorize;

pub fn print_banner() {
    println!(
        "{}",
        format!("sysopt - Linux System Optimizer v{}", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_header(label: &str) {
    println!("{}", format!("=== {label} ===").bold().white());
}

pub fn print_file_entry(path: &str, size: &str) {
    println!("  {:>12}  {}", size.yellow(), path.dimmed());
}

pub fn print_total(label: &str, total: &str) {
    println!("  {} {}", format!("{label}:").bold(), total.green());
    println!();
}

pub fn print_line(line: &str) {
    println!("  {line}");
}

pub fn print_recommendation(msg: &str) {
    println!("  {} {}", "*".cyan().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_info(msg: &str) {
    println!("{} {}", "Info:".cyan().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{} {}", "Done:".green().bold(), msg.green());
}

pub fn print_deleted(path: &str) {
    println!("  {} {}", "Deleted".red(), path.dimmed());
}

pub fn print_dry_run_footer(command: &str) {
    println!(
        "{}",
        format!("This was a dry run. Run `{command} --confirm` to delete.")
            .yellow()
            .bold()
    );
}

pub fn print_removed_summary(removed: usize, requested: usize) {
    let line = format!("Removed {removed} of {requested} files");
    if removed == requested {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line.yellow().bold());
    }
}
