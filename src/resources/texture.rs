use anyhow::Context as _;

use crate::data_structures::texture;

/// The fixed set of images the globe knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    EarthColor,
    EarthNormal,
    EarthDisplacement,
    CloudColor,
    CloudAlpha,
}

impl TextureSlot {
    /// Path relative to the assets root. Normal and displacement share one image.
    pub fn path(&self) -> &'static str {
        match self {
            TextureSlot::EarthColor => "textures/earthmap.jpg",
            TextureSlot::EarthNormal | TextureSlot::EarthDisplacement => {
                "textures/occulantearth.jpg"
            }
            TextureSlot::CloudColor => "textures/clouds.jpg",
            TextureSlot::CloudAlpha => "textures/fairweather.jpeg",
        }
    }

    /// Data textures are sampled as-is, colour textures go through sRGB decoding.
    pub fn is_linear(&self) -> bool {
        !matches!(self, TextureSlot::EarthColor | TextureSlot::CloudColor)
    }

    /// What the slot shows until its image arrives: white colour, a flat normal,
    /// no displacement and fully transparent clouds.
    pub fn placeholder(&self) -> [u8; 4] {
        match self {
            TextureSlot::EarthColor | TextureSlot::CloudColor => [255, 255, 255, 255],
            TextureSlot::EarthNormal => [127, 127, 255, 255],
            TextureSlot::EarthDisplacement | TextureSlot::CloudAlpha => [0, 0, 0, 255],
        }
    }

    pub fn placeholder_texture(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> texture::Texture {
        texture::Texture::solid(
            device,
            queue,
            self.placeholder(),
            &format!("{:?} placeholder", self),
            self.is_linear(),
        )
    }
}

/// Group slots by the file behind them, keeping first-seen order, so each file
/// is fetched and decoded once.
pub fn group_by_path(slots: &[TextureSlot]) -> Vec<(&'static str, Vec<TextureSlot>)> {
    let mut by_path: Vec<(&'static str, Vec<TextureSlot>)> = Vec::new();
    for &slot in slots {
        match by_path.iter_mut().find(|(path, _)| *path == slot.path()) {
            Some((_, group)) => {
                if !group.contains(&slot) {
                    group.push(slot);
                }
            }
            None => by_path.push((slot.path(), vec![slot])),
        }
    }
    by_path
}

/// Shrink `img` to fit `max_dimension` on both axes, keeping its aspect ratio.
/// Images that already fit are returned untouched.
pub fn fit_to_limit(img: image::DynamicImage, max_dimension: u32) -> image::DynamicImage {
    let (width, height) = (img.width(), img.height());
    if width <= max_dimension && height <= max_dimension {
        return img;
    }
    log::warn!(
        "{}x{} texture exceeds the device limit of {}, downscaling",
        width,
        height,
        max_dimension
    );
    img.resize(
        max_dimension,
        max_dimension,
        image::imageops::FilterType::Triangle,
    )
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("cannot read page origin"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.error_for_status()?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        tokio::fs::read(path).await?
    };

    Ok(data)
}

/// Fetch and decode the image behind `slot`. Uploading happens on the render thread.
pub async fn load_image(slot: TextureSlot) -> anyhow::Result<image::DynamicImage> {
    load_image_file(slot.path()).await
}

/// Fetch and decode an image relative to the assets root.
pub async fn load_image_file(file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(file_name)
        .await
        .with_context(|| format!("cannot read {}", file_name))?;
    let img = image::load_from_memory(&data)
        .with_context(|| format!("cannot decode {}", file_name))?;
    log::debug!("decoded {} ({}x{})", file_name, img.width(), img.height());
    Ok(img)
}
