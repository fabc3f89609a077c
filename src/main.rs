use globe_flow::{GlobeOptions, SceneOptions};

fn main() -> anyhow::Result<()> {
    let scene = match std::env::args().nth(1).as_deref() {
        Some("key-lit") => SceneOptions::key_lit(),
        Some("ambient") => SceneOptions::ambient(),
        _ => SceneOptions::moonlit(),
    };
    globe_flow::run(GlobeOptions::default().with_scene(scene))
}
