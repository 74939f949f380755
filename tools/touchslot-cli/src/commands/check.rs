//! Validate the device configuration.

use touchslot_common::AppConfig;
use touchslot_event_model::{codes, MtAxis};
use touchslot_mt::{compat, MtEngine};

pub fn run(config: AppConfig, save: bool) -> anyhow::Result<()> {
    println!("touchslot Configuration Check");
    println!("{}", "=".repeat(50));

    let engine = match MtEngine::from_device_config(&config.device) {
        Ok(engine) => engine,
        Err(e) => {
            println!("[FAIL] {}: {e}", config.device.name);
            anyhow::bail!("configuration is not usable");
        }
    };
    let (policy, caps) = (engine.config(), engine.caps());

    println!("[OK] Device: {}", config.device.name);
    println!(
        "     {} slots, {} input, {} output",
        caps.max_slots(),
        super::protocol_name(policy.protocol),
        super::protocol_name(policy.output_protocol())
    );
    println!(
        "     tracking: {}  keep ids: {}  autorelease: {}  single-touch echo: {}  direct: {}",
        policy.track,
        policy.keep_tracking_ids,
        policy.autorelease,
        policy.st_compat,
        caps.is_direct()
    );

    println!();
    println!("Axes:");
    for axis in MtAxis::ALL {
        if let Some(range) = caps.range(axis) {
            println!(
                "  {:<22} [{}, {}] res {}",
                axis.name(),
                range.min,
                range.max,
                range.resolution
            );
        }
    }

    if policy.st_compat {
        println!();
        println!("Single-touch echo:");
        for (code, range) in compat::compat_axes(caps) {
            let name = codes::abs_name(code).unwrap_or("?");
            println!("  {name:<22} [{}, {}]", range.min, range.max);
        }
    }

    if save {
        config.save()?;
        println!();
        println!(
            "Saved to {}",
            touchslot_common::config_file_path().display()
        );
    }
    Ok(())
}
