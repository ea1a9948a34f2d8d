//! Internal macros

/// Derive the owned and mixed-reference forms of a binary operator from the
/// `&lhs op &rhs` implementation.
macro_rules! forward_binop {
    (impl $imp:ident, $method:ident for $lhs:ty, $rhs:ty => $out:ty) => {
        impl<T: Real> $imp<$rhs> for $lhs {
            type Output = $out;

            #[inline]
            fn $method(self, rhs: $rhs) -> $out {
                (&self).$method(&rhs)
            }
        }

        impl<'a, T: Real> $imp<&'a $rhs> for $lhs {
            type Output = $out;

            #[inline]
            fn $method(self, rhs: &'a $rhs) -> $out {
                (&self).$method(rhs)
            }
        }

        impl<'a, T: Real> $imp<$rhs> for &'a $lhs {
            type Output = $out;

            #[inline]
            fn $method(self, rhs: $rhs) -> $out {
                self.$method(&rhs)
            }
        }
    };
}
