use openloop_profile::*;

fn main() {
    let distance = 1.0; // meters
    let plan_result = MotionPlan::new(distance, ProfileKind::Trapezoidal);

    match plan_result {
        Ok(plan) => {
            println!("Planning open-loop move...");
            println!("  Profile:      {}", plan.kind());
            println!("  Distance:     {} m", plan.distance());
            println!("  Max velocity: {} m/s", plan.max_velocity());
            println!("  Total time:   {:.3} s", plan.total_time());
            println!("\nStepping at 100 Hz...");

            let mut state = RunState::new();
            let mut elapsed = 0.0;
            let mut tick = 0u32;
            loop {
                match plan.step(&mut state, elapsed) {
                    Ok(cmd) => {
                        // Print once per simulated half second
                        if tick % 50 == 0 || cmd.done {
                            println!("t = {:>6.2} s  cmd: {}", elapsed, cmd);
                        }
                        if cmd.done {
                            break;
                        }
                    }
                    Err(e) => {
                        eprintln!("Error stepping profile at t = {}: {:?}", elapsed, e);
                        break;
                    }
                }
                elapsed += NOMINAL_TICK_INTERVAL;
                tick += 1;
            }

            println!("\nRun complete.");
            println!("Final state: {}", state);
        }
        Err(e) => {
            eprintln!("Failed to plan move: {:?}", e);
            eprintln!("Please ensure distance ({}) is positive.", distance);
        }
    }
}
