//! Lumen command-line renderer.
//!
//! Builds a demo scene, renders it on a worker-thread pool with a terminal
//! progress bar, and writes the result to a PNG.

mod progress_bar;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use lumen_math::Vec3;
use lumen_render::{
    render_to_file, Background, Camera, Color, Dielectric, DiffuseLight, Hittable, ImageBuffer,
    Lambertian, Metal, RenderSettings, Scene, Sphere,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use progress_bar::ProgressBar;

struct Args {
    width: u32,
    height: u32,
    samples: u32,
    bounces: u32,
    threads: usize,
    seed: u64,
    accelerator: String,
    output: PathBuf,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args {
            width: 800,
            height: 450,
            samples: 100,
            bounces: 50,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            seed: 0,
            accelerator: "bvh".to_string(),
            output: PathBuf::from("render.png"),
        };

        let mut it = std::env::args().skip(1);
        while let Some(flag) = it.next() {
            let mut value = || {
                it.next()
                    .with_context(|| format!("missing value for {flag}"))
            };
            match flag.as_str() {
                "--width" => args.width = value()?.parse()?,
                "--height" => args.height = value()?.parse()?,
                "--samples" => args.samples = value()?.parse()?,
                "--bounces" => args.bounces = value()?.parse()?,
                "--threads" => args.threads = value()?.parse()?,
                "--seed" => args.seed = value()?.parse()?,
                "--accelerator" => args.accelerator = value()?,
                "--output" | "-o" => args.output = PathBuf::from(value()?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag '{other}', try --help"),
            }
        }

        if args.width == 0 || args.height == 0 {
            bail!("image dimensions must be non-zero");
        }
        Ok(args)
    }
}

fn print_usage() {
    println!(
        "usage: lumen [--width N] [--height N] [--samples N] [--bounces N]\n\
         \x20            [--threads N] [--seed N] [--accelerator bvh] [--output FILE]"
    );
}

fn build_scene(accelerator: &str) -> Result<Scene> {
    let mut scene = Scene::with_accelerator_name(accelerator, Background::Sky)?;

    let mut objects: Vec<Arc<dyn Hittable>> = vec![
        // Ground
        Arc::new(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Lambertian::new(Color::new(0.5, 0.5, 0.5)),
        )),
        // Three feature spheres
        Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5))),
        Arc::new(Sphere::new(
            Vec3::new(-4.0, 1.0, 0.0),
            1.0,
            Lambertian::new(Color::new(0.4, 0.2, 0.1)),
        )),
        Arc::new(Sphere::new(
            Vec3::new(4.0, 1.0, 0.0),
            1.0,
            Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
        )),
        // Overhead lamp
        Arc::new(Sphere::new(
            Vec3::new(0.0, 7.0, 2.0),
            1.5,
            DiffuseLight::new(Color::new(6.0, 6.0, 6.0)),
        )),
    ];

    // Scatter small random spheres around the feature ones
    let mut rng = StdRng::seed_from_u64(2022);
    for a in -6..6 {
        for b in -6..6 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let sphere: Arc<dyn Hittable> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Arc::new(Sphere::new(center, 0.2, Lambertian::new(albedo)))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                Arc::new(Sphere::new(center, 0.2, Metal::new(albedo, 0.5 * rng.gen::<f32>())))
            } else {
                Arc::new(Sphere::new(center, 0.2, Dielectric::new(1.5)))
            };
            objects.push(sphere);
        }
    }

    // Single bulk load, single accelerator rebuild
    scene.load_all(objects);
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse()?;

    let start = Instant::now();
    let scene = build_scene(&args.accelerator)?;
    log::info!(
        "scene built with {} objects in {:?}",
        scene.objects().len(),
        start.elapsed()
    );

    let camera = Camera::new(
        Vec3::new(13.0, 2.0, 3.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::Y,
        20.0,
        args.width as f32 / args.height as f32,
    );
    let mut image = ImageBuffer::new(args.width, args.height, args.samples);
    let settings = RenderSettings {
        threads: args.threads,
        max_bounces: args.bounces,
        seed: args.seed,
    };

    eprintln!(
        "Rendering {}x{} @ {} spp on {} threads",
        args.width, args.height, args.samples, settings.threads
    );

    let start = Instant::now();
    render_to_file(
        &scene,
        &camera,
        &mut image,
        &settings,
        &mut ProgressBar,
        &args.output,
    )?;

    eprintln!(
        "Rendered in {:?}, wrote {}",
        start.elapsed(),
        args.output.display()
    );
    Ok(())
}
