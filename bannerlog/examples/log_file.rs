use bannerlog::{LogFile, Logger};

fn main() {
    let path = "/tmp/bannerlog_example.log";
    std::fs::remove_file(path).ok();

    let logger = Logger::new("[file-demo]", false, false)
        .with_added_output(LogFile::new(path).expect("Unable to create log file"));

    for i in 0..5 {
        bannerlog::info!(logger, "Log message number {i}");
    }

    println!("\n--- {path} ---");
    print!("{}", std::fs::read_to_string(path).unwrap());
}
