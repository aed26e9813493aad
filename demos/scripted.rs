use clockface::logging::{init_logging, LoggingConfig};
use clockface::{Clock, ClockCommand, ClockConfig, ClockTime};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default());

    let config = ClockConfig::builder()
        .title("Scripted clock".to_string())
        .clock_radius(180.0)
        .build();
    let mut clock = Clock::starting_at(config, ClockTime::new(11, 59, 40)?);

    let (sender, receiver) = mpsc::channel();

    // Cycle through fast-forward, freeze and a time jump.
    thread::spawn(move || {
        let script = [
            (ClockCommand::SetRate(5.0), 4),
            (ClockCommand::SetRate(0.0), 2),
            (ClockCommand::SetRate(1.0), 3),
            (ClockCommand::Stop, 2),
            (ClockCommand::Continue, 1),
            (ClockCommand::SetTime(ClockTime::MIDNIGHT), 5),
        ];
        for (command, pause) in script.iter().cycle() {
            if sender.send(*command).is_err() {
                break;
            }
            thread::sleep(Duration::from_secs(*pause));
        }
    });

    println!("Displaying a clock driven by a command script:");
    println!("- rate 5x, freeze at rate 0, back to 1x");
    println!("- stop, continue, jump to midnight");
    println!("Close the window to exit");

    clock.show_with_commands(receiver)?;
    Ok(())
}
