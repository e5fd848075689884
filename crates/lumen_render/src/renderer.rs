//! Multi-threaded render scheduler.
//!
//! Pixels are partitioned round-robin over a fixed pool of worker threads
//! before any thread starts; there is no work stealing. Each worker owns its
//! own seeded rng, samples its pixels, and bumps a shared atomic counter once
//! per finished pixel. The coordinator polls that counter for progress
//! reporting, joins every worker, then writes results into the image buffer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{gen_f32, Camera, Color, ImageBuffer, Progress, RenderError, Scene};

/// How often the coordinator polls the progress counter.
const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Number of worker threads
    pub threads: usize,
    /// Maximum ray bounce depth
    pub max_bounces: u32,
    /// Base seed; worker i renders with seed + i
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            threads: 4,
            max_bounces: 50,
            seed: 0,
        }
    }
}

/// Assign every pixel of a width x height grid to one of `threads` lists,
/// round-robin over the flattened (row, col) enumeration.
///
/// The union of the lists is the full pixel set, each pixel exactly once.
pub fn partition_pixels(width: u32, height: u32, threads: usize) -> Vec<Vec<(u32, u32)>> {
    let threads = threads.max(1);
    let mut lists = vec![Vec::new(); threads];

    let mut cur = 0;
    for row in 0..height {
        for col in 0..width {
            lists[cur].push((row, col));
            cur = (cur + 1) % threads;
        }
    }

    lists
}

/// Render the scene into the image buffer.
///
/// Blocks until every pixel is written. A panic in any worker aborts the
/// whole render with an error after all threads have been joined; no
/// partially-defined image is ever produced.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    image: &mut ImageBuffer,
    settings: &RenderSettings,
    progress: &mut dyn Progress,
) -> Result<(), RenderError> {
    let width = image.width();
    let height = image.height();
    let samples = image.samples_per_pixel();
    let total = (width as usize) * (height as usize);

    if total == 0 {
        progress.done();
        return Ok(());
    }

    let assignments = partition_pixels(width, height, settings.threads);
    log::info!(
        "rendering {}x{} at {} spp on {} threads",
        width,
        height,
        samples,
        assignments.len()
    );

    let counter = AtomicUsize::new(0);

    let results = thread::scope(|s| {
        let counter = &counter;

        let handles: Vec<_> = assignments
            .into_iter()
            .enumerate()
            .map(|(worker, pixels)| {
                s.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(settings.seed.wrapping_add(worker as u64));
                    let mut out = Vec::with_capacity(pixels.len());

                    for (row, col) in pixels {
                        let mut color = Color::ZERO;
                        for _ in 0..samples {
                            let dx = gen_f32(&mut rng);
                            let dy = gen_f32(&mut rng);
                            let x = (col as f32 + dx) / width as f32;
                            let y = (row as f32 + dy) / height as f32;
                            let ray = camera.get_ray(x, y);
                            color += scene.ray_color(&ray, settings.max_bounces, &mut rng);
                        }

                        out.push((row, col, color));
                        counter.fetch_add(1, Ordering::Relaxed);
                    }

                    out
                })
            })
            .collect();

        // The finished-handles check keeps this loop from spinning forever
        // if a worker dies before completing its pixel list.
        while counter.load(Ordering::Relaxed) < total
            && handles.iter().any(|h| !h.is_finished())
        {
            thread::sleep(PROGRESS_POLL_INTERVAL);
            progress.indicate(counter.load(Ordering::Relaxed), total);
        }

        handles
            .into_iter()
            .map(|h| h.join())
            .collect::<Vec<_>>()
    });

    for (worker, result) in results.into_iter().enumerate() {
        match result {
            Ok(pixels) => {
                for (row, col, color) in pixels {
                    image.set_pixel(row, col, color);
                }
            }
            Err(_) => {
                log::error!("render worker {worker} panicked, abandoning render");
                return Err(RenderError::WorkerPanicked(worker));
            }
        }
    }

    progress.done();
    Ok(())
}

/// Render and write the finished image to `path`.
pub fn render_to_file(
    scene: &Scene,
    camera: &Camera,
    image: &mut ImageBuffer,
    settings: &RenderSettings,
    progress: &mut dyn Progress,
    path: &Path,
) -> Result<(), RenderError> {
    render(scene, camera, image, settings, progress)?;
    image.write(path)
}
