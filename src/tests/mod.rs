// Test Suite for the Extraction Pipeline
//
// Component tests live next to the code they cover (see the walker's inline
// module); everything that spans a component boundary sits here.

pub mod dataset;
pub mod javascript;
pub mod schema;
