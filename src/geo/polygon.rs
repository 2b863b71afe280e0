use super::*;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Polygon {
    /// vertices relative to the pose position, already rotated and scaled
    offsets: Vec<V2>,
    /// unit edge normals, one per distinct axis
    normals: Vec<V2>,
}

impl Polygon {
    /// Builds a polygon from vertices given relative to the body position.
    /// The vertices get shifted so that their area weighted centroid lands on
    /// the body position.
    pub fn new(vertices: &[V2]) -> Self {
        let mut res = Polygon {
            offsets: vertices.to_vec(),
            normals: Vec::new(),
        };
        res.recompute_origin();
        res.recompute_normals();
        res
    }

    /// axis aligned rectangle centered on the body position
    pub fn rectangle(width: Float, height: Float) -> Self {
        let hw = width.abs() * 0.5;
        let hh = height.abs() * 0.5;
        Polygon::new(&[
            V2::new(-hw, -hh),
            V2::new(hw, -hh),
            V2::new(hw, hh),
            V2::new(-hw, hh),
        ])
    }

    pub fn offsets(&self) -> &[V2] {
        &self.offsets
    }

    pub fn vertices(&self, pose: &Pose) -> Vec<P2> {
        self.offsets.iter().map(|o| pose.position + o).collect()
    }

    /// shoelace sum, positive for counter clockwise winding
    fn signed_area(&self) -> Float {
        self.edges()
            .map(|(a, b)| a.cross2(b))
            .sum::<Float>()
            * 0.5
    }

    fn edges(&self) -> impl Iterator<Item = (&V2, &V2)> + '_ {
        let n = self.offsets.len();
        (0..n).map(move |i| (&self.offsets[i], &self.offsets[(i + 1) % n]))
    }

    fn centroid(&self) -> V2 {
        let area = self.signed_area();
        if area.abs() < EPSILON {
            return mean(&self.offsets);
        }
        let sum = self.edges().fold(V2::zeros(), |acc, (a, b)| {
            acc + (a + b) * a.cross2(b)
        });
        sum / (6.0 * area)
    }

    fn recompute_origin(&mut self) {
        if self.offsets.is_empty() {
            return;
        }
        let offset = self.centroid();
        for p in self.offsets.iter_mut() {
            *p -= offset;
        }
    }

    fn recompute_normals(&mut self) {
        let mut normals: Vec<V2> = Vec::with_capacity(self.offsets.len());
        let mut seen: Vec<(Float, Float)> = Vec::with_capacity(self.offsets.len());
        for (a, b) in self.edges() {
            let normal = (b - a).turn(Turn::Clockwise).normalize_or_zero();
            if normal == V2::zeros() {
                continue;
            }
            // n and -n describe the same separating axis
            let canonical = if normal.x < -EPSILON || (normal.x.abs() <= EPSILON && normal.y < 0.0) {
                -normal
            } else {
                normal
            };
            let key = (normal_key(canonical.x), normal_key(canonical.y));
            if !seen.contains(&key) {
                seen.push(key);
                normals.push(normal);
            }
        }
        self.normals = normals;
    }

    pub fn get_line_segments(&self, pose: &Pose) -> Vec<LineSegment> {
        self.edges()
            .map(|(a, b)| LineSegment::from_ab(P2::from(*a), P2::from(*b)))
            .map(|mut ls| {
                ls.shift(&pose.position.coords);
                ls
            })
            .collect()
    }
}

impl Project for Polygon {
    fn project(&self, pose: &Pose, axis: &V2) -> Projection {
        let base = pose.position.coords.dot(axis);
        Projection::from_values(self.offsets.iter().map(|o| base + o.dot(axis)))
            .unwrap_or_else(|| Projection::new(base, base))
    }
}

impl ClosestPoint for Polygon {
    fn closest_point_to(&self, pose: &Pose, p: &P2) -> P2 {
        let mut res = (pose.position, Float::MAX);
        for ls in self.get_line_segments(pose) {
            let cp = ls.closest_point(p);
            let dist_sq = distance_squared(p, &cp);
            if dist_sq < res.1 {
                res = (cp, dist_sq)
            }
        }
        res.0
    }
}

impl HasAabb for Polygon {
    fn get_aabb(&self, pose: &Pose) -> Aabb {
        Aabb::from_points(&self.vertices(pose))
            .unwrap_or_else(|| Aabb::from_center(&pose.position, 0.0, 0.0))
    }
}

impl HasArea for Polygon {
    fn area(&self, _pose: &Pose) -> Float {
        self.signed_area().abs()
    }
}

impl HasNormals for Polygon {
    fn normals(&self) -> &[V2] {
        &self.normals
    }
}

impl Scale for Polygon {
    fn scale(&mut self, pose: &Pose, scale_x: Float, scale_y: Float) {
        for p in self.offsets.iter_mut() {
            *p = p
                .rotated(-pose.rotation)
                .scaled_xy(scale_x, scale_y)
                .rotated(pose.rotation);
        }
        self.recompute_normals();
    }
}

impl Rotate for Polygon {
    fn rotate(&mut self, radians: Float) {
        for p in self.offsets.iter_mut() {
            p.rotate_mut(radians);
        }
        for n in self.normals.iter_mut() {
            n.rotate_mut(radians);
        }
    }
}

/// components below `EPSILON` are rounding noise of an axis-aligned edge
fn normal_key(component: Float) -> Float {
    if component.abs() < EPSILON {
        0.0
    } else {
        round_to_significant(component, NORMAL_PRECISION)
    }
}
