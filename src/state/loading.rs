use std::rc::Rc;
use yew::Reducible;

/// Frame preload bookkeeping for the loading overlay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub total: u32,
    pub loaded: u32,
    pub failed: u32,
    /// Set once every frame settled and the reveal delay passed.
    pub ready: bool,
}

pub enum LoadAction {
    FrameLoaded,
    FrameFailed,
    Reveal,
}

impl LoadProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Every frame has either loaded or failed.
    pub fn settled(&self) -> bool {
        self.loaded + self.failed >= self.total
    }

    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.loaded + self.failed) * 100 / self.total).min(100)
    }
}

impl Reducible for LoadProgress {
    type Action = LoadAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use LoadAction::*;
        let mut new = (*self).clone();
        match action {
            FrameLoaded => {
                if !new.settled() {
                    new.loaded += 1;
                }
            }
            FrameFailed => {
                if !new.settled() {
                    new.failed += 1;
                }
            }
            Reveal => {
                if new.settled() {
                    new.ready = true;
                }
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: LoadProgress, actions: Vec<LoadAction>) -> LoadProgress {
        let mut rc = Rc::new(state);
        for a in actions {
            rc = rc.reduce(a);
        }
        (*rc).clone()
    }

    #[test]
    fn failures_count_toward_settling() {
        let p = apply(
            LoadProgress::new(3),
            vec![LoadAction::FrameLoaded, LoadAction::FrameFailed],
        );
        assert!(!p.settled());
        assert_eq!(p.percent(), 66);
        let p = apply(p, vec![LoadAction::FrameLoaded]);
        assert!(p.settled());
        assert_eq!(p.percent(), 100);
        assert_eq!(p.failed, 1);
    }

    #[test]
    fn reveal_waits_for_every_frame() {
        let p = apply(LoadProgress::new(2), vec![LoadAction::FrameLoaded, LoadAction::Reveal]);
        assert!(!p.ready);
        let p = apply(p, vec![LoadAction::FrameLoaded, LoadAction::Reveal]);
        assert!(p.ready);
    }

    #[test]
    fn extra_callbacks_do_not_overcount() {
        let p = apply(
            LoadProgress::new(1),
            vec![LoadAction::FrameLoaded, LoadAction::FrameLoaded, LoadAction::FrameFailed],
        );
        assert_eq!((p.loaded, p.failed), (1, 0));
    }
}
