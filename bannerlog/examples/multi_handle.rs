use bannerlog::{Level, Logger};

fn main() {
    let mut main_logger = Logger::new("", true, false);
    main_logger.set_banner("main").set_level(Level::Debug);
    main_logger.info("Hello, world!");

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let mut logger = Logger::new("", true, true);
            logger.set_banner(&format!("thread {i}"));
            std::thread::spawn(move || {
                logger.debug("started");
                bannerlog::warn!(logger, "multi-line\nmessage from thread {i}");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // raising the level through one handle silences every other handle
    main_logger.set_level(Level::Error);
    Logger::new("[other]", true, false).info("not printed");
    main_logger.fake_panic("printing a backtrace without panicking");
}
