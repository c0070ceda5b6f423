#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vlist_core::{EngineConfig, HeightMode, Viewport, WindowEngine};

#[derive(Debug, Arbitrary)]
enum Op {
    Append(u8),
    Report(u16, f64),
    Scroll(f64),
    Resize(f64, f64),
    Load(bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    buffer: u8,
    estimate: bool,
    units: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }
    let mut config = EngineConfig::default()
        .with_buffer_size(usize::from(input.buffer % 8))
        .with_placeholder_height(20.0);
    if input.estimate {
        config = config.with_height_mode(HeightMode::Estimate);
    }
    if input.units {
        config = config.with_units(750.0);
    }
    let mut engine: WindowEngine<u32> = WindowEngine::new(config);

    for op in input.ops {
        match op {
            Op::Append(n) => {
                engine.append_page((0..u32::from(n % 32)).collect());
            }
            Op::Report(idx, px) => {
                let _ = engine.report_measured_height(usize::from(idx), px);
            }
            Op::Scroll(px) => engine.set_scroll(px),
            Op::Resize(w, h) => engine.set_viewport(Viewport::new(w, h)),
            Op::Load(ok) => {
                if let Some(request) = engine.begin_load() {
                    let batch: Result<Vec<u32>, &str> = if ok { Ok(vec![1, 2, 3]) } else { Err("fuzz") };
                    let _ = engine.finish_load(request, batch);
                }
            }
        }

        // Post-conditions that must always hold:
        let offsets = engine.offsets();
        assert_eq!(offsets.len(), engine.len());
        for pair in offsets.windows(2) {
            assert!(pair[0] <= pair[1], "offsets not monotone");
        }
        assert!(!engine.load_state().in_flight());

        let window = engine.visible_window();
        assert!(window.end_index <= engine.len());
        assert_eq!(window.items.len(), window.end_index - window.start_index);
        assert_eq!(window, engine.visible_window());
    }
});
