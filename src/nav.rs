/// One navigation action the device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    /// Select the parent of the current folder.
    Parent,
    /// Select the child folder with the given key.
    Child(u32),
}

/// Our belief about the folder the device currently shows.
///
/// The device only knows "go into folder" and "go to parent", so the path is
/// tracked client side. It has to be reset whenever the navigation mode is
/// (re-)enabled or the player mode changes, both put the device back at the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavPath {
    path: Vec<u32>,
}

impl NavPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.path
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }

    /// Applies a step that the device acknowledged.
    pub fn apply(&mut self, step: NavStep) {
        match step {
            NavStep::Child(key) => self.path.push(key),
            NavStep::Parent => {
                if self.path.pop().is_none() {
                    tracing::warn!("selected parent folder while already at the navigation root");
                }
            }
        }
    }

    /// Computes the fewest steps that lead from the tracked path to `target`.
    ///
    /// Leaves deeper folders first, then walks `target` and only goes back up
    /// where the tracked path diverges from it.
    pub fn plan(&self, target: &[u32]) -> Vec<NavStep> {
        let mut current = self.path.clone();
        let mut steps = Vec::new();

        while current.len() > target.len() {
            current.pop();
            steps.push(NavStep::Parent);
        }

        let mut depth = 0;
        while depth < target.len() {
            let key = target[depth];
            if depth >= current.len() {
                current.push(key);
                steps.push(NavStep::Child(key));
                depth += 1;
            } else if current[depth] != key {
                // mismatch at this depth, go up and look again
                while current.len() > depth {
                    current.pop();
                    steps.push(NavStep::Parent);
                }
            } else {
                depth += 1;
            }
        }

        steps
    }
}
