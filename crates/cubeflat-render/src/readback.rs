//! Copy a rendered target back to the CPU as RGBA8 pixels.

/// Errors raised while reading a texture back.
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    /// Only 4-byte RGBA/BGRA formats can be read back.
    #[error("cannot read back texture format {0:?}")]
    UnsupportedFormat(wgpu::TextureFormat),

    /// The buffer could not be mapped.
    #[error("failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    /// The map callback never ran.
    #[error("readback buffer map callback was dropped")]
    CallbackDropped,
}

/// A texture copy waiting in a mappable buffer.
pub struct PendingReadback {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    bgra: bool,
}

/// Encode a copy of `texture` into a mappable buffer.
///
/// Submit `encoder` before calling [`PendingReadback::read_rgba`].
pub fn copy_texture_to_buffer(
    device: &wgpu::Device,
    encoder: &mut wgpu::CommandEncoder,
    texture: &wgpu::Texture,
) -> Result<PendingReadback, ReadbackError> {
    let format = texture.format();
    let bgra = match format {
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
        other => return Err(ReadbackError::UnsupportedFormat(other)),
    };

    let width = texture.width();
    let height = texture.height();
    let padded_bytes_per_row = padded_bytes_per_row(width);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cubeflat-readback"),
        size: u64::from(padded_bytes_per_row * height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    Ok(PendingReadback {
        buffer,
        width,
        height,
        padded_bytes_per_row,
        bgra,
    })
}

/// Row pitch satisfying `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Drop row padding and swizzle BGRA to RGBA.
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_row: u32, bgra: bool) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * padded_row as usize;
        let row_data = &data[start..start + row_bytes];
        if bgra {
            for chunk in row_data.chunks_exact(4) {
                pixels.extend_from_slice(&[chunk[2], chunk[1], chunk[0], chunk[3]]);
            }
        } else {
            pixels.extend_from_slice(row_data);
        }
    }
    pixels
}

impl PendingReadback {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Map the buffer, wait for the GPU and return tightly packed RGBA8 rows.
    pub fn read_rgba(self, device: &wgpu::Device) -> Result<Vec<u8>, ReadbackError> {
        let slice = self.buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        if let Err(e) = device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        }) {
            log::warn!("device poll during readback failed: {e}");
        }

        rx.recv().map_err(|_| ReadbackError::CallbackDropped)??;

        let pixels = {
            let mapped = slice.get_mapped_range();
            unpad_rows(
                &mapped,
                self.width,
                self.height,
                self.padded_bytes_per_row,
                self.bgra,
            )
        };
        self.buffer.unmap();
        Ok(pixels)
    }
}
