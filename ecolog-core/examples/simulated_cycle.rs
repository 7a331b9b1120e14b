//! Drive the full pipeline against simulated providers
//!
//! Runs three offline cycles, brings the link up, runs one more and prints
//! the store contents at each stage. No hardware, no network, no files.
//!
//! ```sh
//! cargo run --example simulated_cycle
//! ```

use ecolog_core::{
    config::{PowerConfig, SensorConfig, TimeConfig, UploadConfig},
    constants::{PHOTORESISTOR_PIN, THERMISTOR_PIN},
    power::PowerManager,
    sensors::SensorManager,
    storage::{DataLog, MemoryStore},
    time::TimeManager,
    traits::{
        FixedClock, FixedLink, FixedWallClock, NoopDelay, ScriptedAnalog, ScriptedPower,
        ScriptedTransport,
    },
    upload::Uploader,
    DataLogger,
};

fn main() {
    // Healthy thermistor, dead photoresistor: the light channel will run
    // on synthesized data from the first probe on
    let adc = ScriptedAnalog::new(&[(THERMISTOR_PIN, &[2048]), (PHOTORESISTOR_PIN, &[4095])]);

    let sensors = SensorManager::new(adc, SensorConfig::default());
    let time = TimeManager::new(
        FixedClock::new(0),
        FixedWallClock::synced(1_705_339_825),
        NoopDelay,
        TimeConfig::default(),
    );
    let log = DataLog::new(MemoryStore::new());
    let uploader = Uploader::new(ScriptedTransport::always_ok(), NoopDelay, UploadConfig::default());
    let power = PowerManager::new(ScriptedPower::timer_only(), NoopDelay, PowerConfig::demo());

    let mut logger = DataLogger::new(sensors, time, log, uploader, power, FixedLink::new(false));
    logger.init().expect("memory store cannot fail to open");

    logger.run_cycles(3);
    println!("--- after 3 offline cycles ---");
    println!("{}", logger.log_mut().store_mut().content());
    println!("pending records: {}", logger.log_mut().pending_count());

    logger.link_mut().set_online(true);
    let report = logger.run_cycle();
    println!("--- after 1 online cycle ---");
    println!("{}", logger.log_mut().store_mut().content());
    println!(
        "uploaded: {}, batches sent: {}, woke by: {}",
        report.uploaded,
        logger.uploader().batches_sent(),
        report.wake.name(),
    );
}
