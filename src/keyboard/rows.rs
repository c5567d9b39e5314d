use crate::keyboard::key::PhysicalKey;

/// Keys of one practice row, split by hand. Pattern generation pairs and
/// mirrors across the two halves, so the split is part of the contract.
#[derive(Clone, Debug, Default)]
pub struct RowSpec {
    pub left: Vec<PhysicalKey>,
    pub right: Vec<PhysicalKey>,
}

impl RowSpec {
    pub fn new(left: &[PhysicalKey], right: &[PhysicalKey]) -> Self {
        Self {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    pub fn combined(&self) -> Vec<PhysicalKey> {
        self.left.iter().chain(self.right.iter()).copied().collect()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Look up a named row. Names follow the curriculum table; unknown names
/// return `None` and callers fall back to the home row.
pub fn row_spec(name: &str) -> Option<RowSpec> {
    use PhysicalKey::*;
    let spec = match name {
        "home" => RowSpec::new(&[A, S, D, F], &[J, K, L, Semicolon]),
        "top" => RowSpec::new(&[Q, W, E, R], &[U, I, O, P]),
        "bottom" => RowSpec::new(&[Z, X, C, V], &[N, M, Comma, Dot]),
        "numbers" => RowSpec::new(
            &[Num1, Num2, Num3, Num4, Num5],
            &[Num6, Num7, Num8, Num9, Num0, Minus, Equal],
        ),
        "symbols_basic" => RowSpec::new(
            &[Grave],
            &[LeftBracket, RightBracket, Semicolon, Quote],
        ),
        "focus_e_i" => RowSpec::new(&[E], &[I]),
        "focus_r_u" => RowSpec::new(&[R], &[U]),
        "focus_t_o" => RowSpec::new(&[T], &[O]),
        "focus_c_comma" => RowSpec::new(&[C], &[Comma]),
        "focus_g_h" => RowSpec::new(&[G], &[H]),
        "focus_v_n_slash" => RowSpec::new(&[V], &[N, Slash]),
        "focus_w_m" => RowSpec::new(&[W], &[M]),
        "focus_q_p" => RowSpec::new(&[Q], &[P]),
        "focus_b_y" => RowSpec::new(&[B], &[Y]),
        "focus_z_x" => RowSpec::new(&[Z], &[X]),
        "focus_shift_period" => RowSpec::new(
            &[A, S, D, F, E, R, T],
            &[J, K, L, Semicolon, I, U, O, Dot],
        ),
        _ => return None,
    };
    Some(spec)
}

/// Physical rows of the keyboard for the diagram widget, top to bottom.
pub fn diagram_rows() -> Vec<Vec<PhysicalKey>> {
    use PhysicalKey::*;
    vec![
        vec![
            Escape, Grave, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9, Num0, Minus,
            Equal, Backspace,
        ],
        vec![
            Tab, Q, W, E, R, T, Y, U, I, O, P, LeftBracket, RightBracket, Backslash,
        ],
        vec![A, S, D, F, G, H, J, K, L, Semicolon, Quote, Enter],
        vec![
            ShiftLeft, Z, X, C, V, B, N, M, Comma, Dot, Slash, ShiftRight,
        ],
        vec![Space],
    ]
}
