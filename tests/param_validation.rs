// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

// Invalid parameters must surface as errors rather than NaN-filled arrays.

#[cfg(feature = "probability_distributions")]
mod param_validation_tests {
    use minarrow::vec64;
    use stat_kernels::errors::KernelError;
    use stat_kernels::kernels::scientific::distributions::composed::ComposedDistribution;
    use stat_kernels::kernels::scientific::distributions::copula::Copula;
    use stat_kernels::kernels::scientific::distributions::distribution::{
        Distribution, NormalMarginal,
    };
    use stat_kernels::kernels::scientific::distributions::multivariate::{Normal, Student};
    use stat_kernels::kernels::scientific::distributions::univariate::beta::beta_pdf;
    use stat_kernels::kernels::scientific::distributions::univariate::binomial::binomial_pmf;
    use stat_kernels::kernels::scientific::distributions::univariate::chi_squared::chi_square_pdf;
    use stat_kernels::kernels::scientific::distributions::univariate::gamma::gamma_pdf;
    use stat_kernels::kernels::scientific::distributions::univariate::normal::normal_pdf;
    use stat_kernels::kernels::scientific::distributions::univariate::poisson::poisson_pmf;
    use stat_kernels::kernels::scientific::distributions::univariate::student_t::student_t_pdf;
    use stat_kernels::kernels::scientific::linalg::SquareMatrix;

    fn assert_invalid<T: std::fmt::Debug>(got: Result<T, KernelError>) {
        assert!(
            matches!(got, Err(KernelError::InvalidArguments(_))),
            "expected error for invalid parameters, got: {:?}",
            got
        );
    }

    #[test]
    fn beta_pdf_negative_alpha() {
        let x = vec64![0.5];
        assert_invalid(beta_pdf(&x, -1.0, 2.0, None, None));
    }

    #[test]
    fn beta_pdf_zero_beta() {
        let x = vec64![0.5];
        assert_invalid(beta_pdf(&x, 2.0, 0.0, None, None));
    }

    #[test]
    fn normal_pdf_negative_scale() {
        let x = vec64![0.5];
        assert_invalid(normal_pdf(&x, 0.0, -1.0, None, None));
    }

    #[test]
    fn normal_pdf_zero_scale() {
        let x = vec64![0.5];
        assert_invalid(normal_pdf(&x, 0.0, 0.0, None, None));
    }

    #[test]
    fn gamma_pdf_negative_shape() {
        let x = vec64![0.5];
        assert_invalid(gamma_pdf(&x, -1.0, 1.0, None, None));
    }

    #[test]
    fn gamma_pdf_negative_rate() {
        let x = vec64![0.5];
        assert_invalid(gamma_pdf(&x, 2.0, -1.0, None, None));
    }

    #[test]
    fn chi2_pdf_negative_df() {
        let x = vec64![0.5];
        assert_invalid(chi_square_pdf(&x, -1.0, None, None));
    }

    #[test]
    fn chi2_pdf_zero_df() {
        let x = vec64![0.5];
        assert_invalid(chi_square_pdf(&x, 0.0, None, None));
    }

    #[test]
    fn t_pdf_nan_df() {
        let x = vec64![0.5];
        assert_invalid(student_t_pdf(&x, f64::NAN, None, None));
    }

    #[test]
    fn poisson_pmf_negative_rate() {
        let k = vec64![1u64];
        assert_invalid(poisson_pmf(&k, -0.5, None, None));
    }

    #[test]
    fn binomial_pmf_probability_above_one() {
        let k = vec64![1u64];
        assert_invalid(binomial_pmf(&k, 10, 1.5, None, None));
    }

    #[test]
    fn normal_rejects_non_unit_diagonal() {
        let r = SquareMatrix::from_rows(&[&[2.0, 0.0], &[0.0, 1.0]]).unwrap();
        assert!(Normal::new(&[0.0, 0.0], &[1.0, 1.0], r).is_err());
    }

    #[test]
    fn normal_rejects_asymmetric_correlation() {
        let r = SquareMatrix::from_rows(&[&[1.0, 0.3], &[0.1, 1.0]]).unwrap();
        assert!(Normal::new(&[0.0, 0.0], &[1.0, 1.0], r).is_err());
    }

    #[test]
    fn normal_rejects_indefinite_correlation() {
        let r = SquareMatrix::from_rows(&[
            &[1.0, 0.9, -0.9],
            &[0.9, 1.0, 0.9],
            &[-0.9, 0.9, 1.0],
        ])
        .unwrap();
        assert!(Normal::new(&[0.0; 3], &[1.0; 3], r).is_err());
    }

    #[test]
    fn normal_rejects_mean_length_mismatch() {
        let got = Normal::new(&[0.0], &[1.0, 1.0], SquareMatrix::identity(2));
        assert!(matches!(got, Err(KernelError::LengthMismatch(_))));
    }

    #[test]
    fn student_rejects_non_positive_nu() {
        assert!(Student::standard(0.0, 2).is_err());
        assert!(Student::standard(-3.0, 2).is_err());
        assert!(Student::standard(f64::INFINITY, 2).is_err());
    }

    #[test]
    fn composed_rejects_copula_dimension_mismatch() {
        let marginals: Vec<Box<dyn Distribution>> = vec![
            Box::new(NormalMarginal::new(0.0, 1.0).unwrap()),
            Box::new(NormalMarginal::new(0.0, 1.0).unwrap()),
        ];
        let got = ComposedDistribution::new(marginals, Copula::independent(3).unwrap());
        assert!(matches!(got, Err(KernelError::LengthMismatch(_))));
    }

    #[test]
    fn composed_rejects_empty_marginals() {
        let got = ComposedDistribution::independent(Vec::new());
        assert_invalid(got);
    }
}
