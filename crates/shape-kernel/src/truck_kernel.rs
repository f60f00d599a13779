//! TruckKernel: the real geometry kernel wrapping truck's API.

use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Face, Solid};
use truck_modeling::Vector3;
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModels};

/// Tolerance handed to truck-shapeops Booleans.
const BOOLEAN_TOL: f64 = 0.05;
/// Tessellation tolerance used for bounds and face statistics.
pub(crate) const QUERY_TOL: f64 = 0.01;

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    next_id: u64,
    bodies: HashMap<u64, Vec<Solid>>,
    /// Standalone faces created by make_region_face, awaiting extrude.
    standalone_faces: HashMap<u64, Face>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            next_id: 1,
            bodies: HashMap::new(),
            standalone_faces: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn store_body(&mut self, solids: Vec<Solid>) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.bodies.insert(handle.id(), solids);
        handle
    }

    pub(crate) fn get_body(&self, handle: &KernelSolidHandle) -> Option<&[Solid]> {
        self.bodies.get(&handle.id()).map(Vec::as_slice)
    }

    fn body_or_err(&self, handle: &KernelSolidHandle) -> Result<&[Solid], KernelError> {
        self.get_body(handle).ok_or(KernelError::EntityNotFound {
            id: KernelId(handle.id()),
        })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn check_direction(direction: [f64; 3], what: &str) -> Result<[f64; 3], KernelError> {
    part_types::math::normalize(direction).ok_or_else(|| KernelError::InvalidArgument {
        reason: format!("{} direction has zero length", what),
    })
}

fn check_positive(value: f64, what: &str) -> Result<(), KernelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::InvalidArgument {
            reason: format!("{} must be positive, got {}", what, value),
        })
    }
}

impl Kernel for TruckKernel {
    #[instrument(skip(self))]
    fn make_region_face(&mut self, region: &Region, plane: &Plane) -> Result<KernelId, KernelError> {
        let face = primitives::region_face(region, plane)?;
        let face_id = self.alloc_id();
        self.standalone_faces.insert(face_id.0, face);
        Ok(face_id)
    }

    #[instrument(skip(self))]
    fn extrude_faces(
        &mut self,
        faces: &[KernelId],
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let dir = check_direction(direction, "extrude")?;
        check_positive(depth, "extrude depth")?;
        if faces.is_empty() {
            return Err(KernelError::InvalidArgument {
                reason: "no faces to extrude".to_string(),
            });
        }

        let sweep_vec = Vector3::new(dir[0], dir[1], dir[2]) * depth;
        let mut solids = Vec::with_capacity(faces.len());
        for &face in faces {
            let truck_face = self
                .standalone_faces
                .remove(&face.0)
                .ok_or(KernelError::EntityNotFound { id: face })?;
            solids.push(builder::tsweep(&truck_face, sweep_vec));
        }
        debug!(lumps = solids.len(), "extruded faces");
        Ok(self.store_body(solids))
    }

    fn make_cylinder(
        &mut self,
        base: [f64; 3],
        axis: [f64; 3],
        radius: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let axis = check_direction(axis, "cylinder axis")?;
        check_positive(radius, "cylinder radius")?;
        check_positive(height, "cylinder height")?;
        let solid = primitives::make_cylinder(base, axis, radius, height)?;
        Ok(self.store_body(vec![solid]))
    }

    #[instrument(skip(self))]
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let mut result: Vec<Solid> = self.body_or_err(a)?.to_vec();
        let others: Vec<Solid> = self.body_or_err(b)?.to_vec();

        for other in others {
            let other_box = tessellation::solid_bounds(&other, QUERY_TOL);
            let hit = result.iter().position(|s| {
                match (tessellation::solid_bounds(s, QUERY_TOL), other_box) {
                    (Some(sb), Some(ob)) => tessellation::bounds_overlap(&sb, &ob),
                    _ => false,
                }
            });
            match hit {
                Some(i) => {
                    let fused = truck_shapeops::or(&result[i], &other, BOOLEAN_TOL).ok_or_else(
                        || KernelError::BooleanFailed {
                            reason: "truck or() returned None".to_string(),
                        },
                    )?;
                    result[i] = fused;
                }
                None => result.push(other),
            }
        }
        Ok(self.store_body(result))
    }

    #[instrument(skip(self))]
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let targets: Vec<Solid> = self.body_or_err(a)?.to_vec();
        let tools: Vec<Solid> = self.body_or_err(b)?.to_vec();

        let mut result = Vec::with_capacity(targets.len());
        for mut target in targets {
            for tool in &tools {
                let overlaps = match (
                    tessellation::solid_bounds(&target, QUERY_TOL),
                    tessellation::solid_bounds(tool, QUERY_TOL),
                ) {
                    (Some(tb), Some(ob)) => tessellation::bounds_overlap(&tb, &ob),
                    _ => false,
                };
                if !overlaps {
                    continue;
                }
                // Subtraction = A ∩ ¬B. not() mutates in place.
                let mut inverted = tool.clone();
                inverted.not();
                target = truck_shapeops::and(&target, &inverted, BOOLEAN_TOL).ok_or_else(|| {
                    KernelError::BooleanFailed {
                        reason: "truck and() returned None for subtraction".to_string(),
                    }
                })?;
            }
            result.push(target);
        }
        Ok(self.store_body(result))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let solids = self
            .bodies
            .get(&solid.id())
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(solid.id()),
            })?;

        tessellation::tessellate_body(solids, tolerance, &mut self.next_id)
    }

    #[instrument(skip(self))]
    fn export_step(&self, solid: &KernelSolidHandle, name: &str) -> Result<String, KernelError> {
        let solids = self.body_or_err(solid)?;
        if solids.is_empty() {
            return Err(KernelError::StepFailed {
                reason: "body has no lumps".to_string(),
            });
        }

        // one MANIFOLD_SOLID_BREP per lump
        let compressed: Vec<_> = solids.iter().map(Solid::compress).collect();
        let step_string = CompleteStepDisplay::new(
            compressed.iter().collect::<StepModels<_, _, _>>(),
            StepHeaderDescriptor {
                file_name: name.to_owned(),
                organization_system: "meiga-parts".to_owned(),
                ..Default::default()
            },
        )
        .to_string();
        debug!(lumps = solids.len(), bytes = step_string.len(), "STEP document written");
        Ok(step_string)
    }
}
