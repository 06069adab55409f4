//! Demo catalog modelled on a neural renderer family: ray marchers, an LSTM renderer, an
//! SDF renderer with a fixed ray tracer, and a mesh renderer whose rasterizer and shader
//! are both pluggable.

use anyhow::{Result, bail};
use indexmap::IndexMap;
use strata::kernel::{Class, ClassBuilder, Registry, SchemaError, Signature, Target, signature};
use strata::tree::Value;
use tracing::debug;

/// A private [`Registry`] plus every named entry the CLI can extract or build.
#[derive(Debug)]
pub struct Catalog {
    registry: Registry,
    entries: IndexMap<String, Target>,
}

impl Catalog {
    /// Registers the demo implementations and expands every catalog class.
    ///
    /// # Errors
    /// Any registration or expansion error.
    pub fn demo() -> Result<Self, SchemaError> {
        let mut catalog = Self { registry: Registry::new(), entries: IndexMap::new() };

        let raymarcher = Class::replaceable("RaymarcherBase").build();
        let emission_absorption = catalog
            .register(raymarcher_fields(Class::extends(&raymarcher, "EmissionAbsorptionRaymarcher")))?;
        catalog.register(Class::extends(&emission_absorption, "CumsumRaymarcher"))?;

        let coloring = coloring_network();
        let coloring_args = catalog.registry.default_args_field(&coloring);
        let ray_tracing = Class::configurable("RayTracing")
            .field("object_bounding_sphere", 1.0)
            .field("sdf_threshold", 5.0e-5)
            .field("line_search_step", 0.5)
            .field("line_step_iters", 1)
            .field("sphere_tracing_iters", 10)
            .field("n_steps", 100)
            .field("n_secant_steps", 8)
            .build();

        let renderer = Class::replaceable("BaseRenderer").build();
        catalog.register(
            Class::extends(&renderer, "MultiPassEmissionAbsorptionRenderer")
                .field("raymarcher_class_type", "EmissionAbsorptionRaymarcher")
                .member("raymarcher", &raymarcher)
                .field("n_pts_per_ray_fine_training", 64)
                .field("n_pts_per_ray_fine_evaluation", 64)
                .field("stratified_sampling_coarse_training", true)
                .field("stratified_sampling_coarse_evaluation", false)
                .field("append_coarse_samples_to_fine", true)
                .field("density_noise_std_train", 0.0)
                .field("return_weights", false),
        )?;
        catalog.register(
            Class::extends(&renderer, "LSTMRenderer")
                .field("num_raymarch_steps", 10)
                .field("init_depth", 17.0)
                .field("init_depth_noise_std", 5.0e-4)
                .field("hidden_size", 16)
                .field("n_feature_channels", 256)
                .field("bg_color", None::<f64>)
                .field("verbose", false),
        )?;
        catalog.register(
            Class::extends(&renderer, "SignedDistanceFunctionRenderer")
                .field("render_features_dimensions", 3)
                .field("object_bounding_sphere", 1.0)
                .member("ray_tracer", &ray_tracing)
                .field_factory("ray_normal_coloring_network_args", coloring_args)
                .field("bg_color", vec![0.0])
                .field("soft_mask_alpha", 50.0)
                .post_init(|registry, instance| {
                    registry.run_auto_creation(instance)?;
                    match instance.get("render_features_dimensions").and_then(Value::as_i64) {
                        Some(3) => Ok(()),
                        _ => Err(SchemaError::Internal {
                            message: "only RGB colour (render_features_dimensions = 3) is supported"
                                .into(),
                            context: Some(format!("Constructing {}", instance.class()).into()),
                        }),
                    }
                }),
        )?;

        let rasterizer = Class::replaceable("RasterizerBase").build();
        catalog.register(
            Class::extends(&rasterizer, "MeshRasterizer")
                .field("image_size", 256)
                .field("blur_radius", 0.0)
                .field("faces_per_pixel", 1)
                .field("bin_size", None::<i64>)
                .field("cull_backfaces", false),
        )?;
        catalog.register(
            Class::extends(&rasterizer, "MeshRasterizerOpenGL")
                .field("image_size", 256)
                .field("z_clip_value", 0.5),
        )?;

        let shader = Class::replaceable("ShaderBase").build();
        let soft_phong = catalog.register(
            Class::extends(&shader, "SoftPhongShader")
                .field("blend_sigma", 1.0e-4)
                .field("blend_gamma", 1.0e-4)
                .field("znear", 1.0)
                .field("zfar", 100.0)
                .field("background_color", vec![1.0, 1.0, 1.0]),
        )?;
        catalog.register(Class::extends(&soft_phong, "HardFlatShader"))?;
        catalog.register(
            Class::extends(&shader, "SoftSilhouetteShader")
                .field("blend_sigma", 1.0e-4)
                .field("blend_gamma", 1.0e-4),
        )?;

        catalog.add(
            Class::configurable("MeshRenderer")
                .field("rasterizer_class_type", "MeshRasterizer")
                .member("rasterizer", &rasterizer)
                .field("shader_class_type", "SoftPhongShader")
                .member("shader", &shader)
                .build(),
        );
        catalog.add(
            Class::configurable("GenericModel")
                .field("chunk_size_grid", 4096)
                .field("render_image_width", 400)
                .field("render_image_height", 400)
                .field("mask_threshold", 0.5)
                .field("renderer_class_type", "MultiPassEmissionAbsorptionRenderer")
                .member("renderer", &renderer)
                .build(),
        );
        catalog.add(ray_tracing);
        catalog.entries.insert(coloring.name().to_owned(), Target::Callable(coloring));

        for class in catalog.classes() {
            catalog.registry.expand(class)?;
        }
        debug!(entries = catalog.entries.len(), "Demo catalog ready");

        Ok(catalog)
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.entries.iter().map(|(name, target)| (name.as_str(), target))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.entries.values().filter_map(|target| match target {
            Target::Class(class) => Some(class),
            Target::Callable(_) => None,
        })
    }

    /// # Errors
    /// Fails if no entry has this name.
    pub fn lookup(&self, name: &str) -> Result<&Target> {
        match self.entries.get(name) {
            Some(target) => Ok(target),
            None => bail!("Unknown class '{name}'; `strata list` shows the catalog"),
        }
    }

    /// # Errors
    /// Fails if no entry has this name or the entry is a callable.
    pub fn class(&self, name: &str) -> Result<&Class> {
        match self.lookup(name)? {
            Target::Class(class) => Ok(class),
            Target::Callable(_) => bail!("'{name}' is a callable; only classes can be built"),
        }
    }

    fn register(&mut self, builder: ClassBuilder) -> Result<Class, SchemaError> {
        let class = self.registry.register(builder.build())?;
        self.add(class.clone());
        Ok(class)
    }

    fn add(&mut self, class: Class) {
        self.entries.insert(class.name().to_owned(), Target::Class(class));
    }
}

fn raymarcher_fields(builder: ClassBuilder) -> ClassBuilder {
    builder
        .field("surface_thickness", 1)
        .field("bg_color", vec![0.0])
        .field("replicate_last_interval", false)
        .field("background_opacity", 0.0)
        .field("density_relu", true)
        .field("blend_output", false)
}

fn coloring_network() -> Signature {
    signature!(RayNormalColoringNetwork(
        feature_vector_size = 3,
        mode = "idr",
        d_in = 9,
        d_out = 3,
        dims = vec![512, 512, 512, 512],
        weight_norm = true,
        n_harmonic_functions_dir = 0,
        pooled_feature_dim = 0,
    ))
}
