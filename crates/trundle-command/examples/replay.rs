use trundle_command::DriveController;
use trundle_drive::devices::sim::{InstantSettle, sim_pins};
use trundle_drive::{MIN_SETTLE_TIME, OutputDriver};

fn main() {
    let driver = OutputDriver::new(sim_pins(), InstantSettle::default(), MIN_SETTLE_TIME);
    let mut controller = DriveController::new(driver);

    let commands = [
        "/speed/100",
        "/forward/",
        "/speed/180",
        "/stop/",
        "/reverse/",
        "/speed/fast",
        "/speed/1000",
        "/emergencystop/",
    ];

    println!("Replaying {} commands against simulated outputs", commands.len());
    for command in commands {
        let reply = controller.handle(command);
        let target = controller.output_target();
        println!(
            "{:<18} -> {:<36} state: {}  duty L/R: {}/{}  lines: {:?}",
            command,
            reply.message().unwrap_or_else(|| "<control surface>".to_string()),
            controller.state(),
            target.left_duty,
            target.right_duty,
            target.lines,
        );
    }
    println!(
        "Settling waits requested: {}",
        controller.driver().settle_backend().intervals().len()
    );
}
