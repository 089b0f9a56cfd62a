use fnm_inp::Deck;
use fnm_mesh::LayupSpec;

use crate::params::{PresetParameters, UelSettings};
use crate::pipeline::{FnmModel, preprocess};

/// Two unit bricks side by side on a 3 x 2 node grid, one ordinary part.
pub(crate) const TWO_BRICKS: &str = "\
*Heading
** Job name: bricks Model name: Model-1
**
** PARTS
**
*Part, name=fnm-plate
*Node
1, 0., 0., 0.
2, 1., 0., 0.
3, 2., 0., 0.
4, 0., 1., 0.
5, 1., 1., 0.
6, 2., 1., 0.
7, 0., 0., 1.
8, 1., 0., 1.
9, 2., 0., 1.
10, 0., 1., 1.
11, 1., 1., 1.
12, 2., 1., 1.
*Element, type=SC8R
1, 1, 2, 5, 4, 7, 8, 11, 10
2, 2, 3, 6, 5, 8, 9, 12, 11
*Nset, nset=tie-bottom, generate
1, 6, 1
*Nset, nset=left
1, 4, 7, 10
*Elset, elset=predelam
2
*End Part
**
*Part, name=Impactor
*Node
1, 0., 0., 2.
*End Part
**
** ASSEMBLY
**
*Assembly, name=Assembly
*Instance, name=fnm-plate-1, part=fnm-plate
*End Instance
*End Assembly
**
** MATERIALS
**
*Material, name=IM7
*Density
1.6e-09,
**
** BOUNDARY CONDITIONS
**
*Boundary
fnm-plate-1.tie-bottom, ENCASTRE
**
** ----------------------------------------------------------------
**
** STEP: Load
**
*Step, name=Load, nlgeom=YES
*Static
0.01, 1., 1e-05, 0.01
*End Step
";

pub(crate) fn preset() -> PresetParameters {
    PresetParameters {
        layup: LayupSpec {
            symmetric: false,
            angles: vec![0.0, 90.0],
            ply_thickness: 0.125,
        },
        predelam_interface: Some(1),
        min_element_size: 0.5,
        max_element_size: 1.0,
        uel: UelSettings::default(),
    }
}

pub(crate) fn two_brick_model() -> FnmModel {
    let deck = Deck::parse_str(TWO_BRICKS).expect("deck parses");
    preprocess(&deck, &mut preset()).expect("pipeline runs")
}
