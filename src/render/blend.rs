//! Blend state selection.

/// Blend factor for color blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// 0.0
    Zero,
    /// 1.0
    One,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
}

/// A source/destination blend factor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendState {
    /// Standard alpha blending for straight-alpha textures.
    pub fn alpha_blending() -> Self {
        Self {
            src: BlendFactor::SrcAlpha,
            dst: BlendFactor::OneMinusSrcAlpha,
        }
    }

    /// Blending for premultiplied-alpha textures.
    pub fn premultiplied_alpha() -> Self {
        Self {
            src: BlendFactor::One,
            dst: BlendFactor::OneMinusSrcAlpha,
        }
    }

    /// Select the blend state for a slot given the backing page's alpha
    /// mode and the slot's additive flag.
    ///
    /// Additive blending keeps the page-appropriate source factor and
    /// accumulates with a destination factor of one.
    pub fn for_slot(premultiplied_alpha: bool, additive: bool) -> Self {
        let src = if premultiplied_alpha {
            BlendFactor::One
        } else {
            BlendFactor::SrcAlpha
        };
        let dst = if additive {
            BlendFactor::One
        } else {
            BlendFactor::OneMinusSrcAlpha
        };
        Self { src, dst }
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self::premultiplied_alpha()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_blend_selection() {
        assert_eq!(
            BlendState::for_slot(false, false),
            BlendState::alpha_blending()
        );
        assert_eq!(
            BlendState::for_slot(true, false),
            BlendState::premultiplied_alpha()
        );
        assert_eq!(
            BlendState::for_slot(false, true),
            BlendState {
                src: BlendFactor::SrcAlpha,
                dst: BlendFactor::One,
            }
        );
    }

    #[test]
    fn test_premultiplied_additive_uses_one_one() {
        let blend = BlendState::for_slot(true, true);
        assert_eq!(blend.src, BlendFactor::One);
        assert_eq!(blend.dst, BlendFactor::One);
    }
}
